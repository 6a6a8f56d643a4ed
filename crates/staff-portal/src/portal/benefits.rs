//! Benefit store checkout.
//!
//! Items priced only in points are redeemed in one step by the portal state. Items with a
//! cash price go through [`HybridCheckout`]: the employee may offset part of the price with
//! points, fills in a contact form, and confirms a simulated payment.

use serde::{Deserialize, Serialize};

use super::domain::BenefitItem;
use super::error::{require_text, PortalError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPath {
    Points,
    Hybrid,
}

impl BenefitItem {
    pub fn checkout_path(&self) -> CheckoutPath {
        if self.price > 0 {
            CheckoutPath::Hybrid
        } else {
            CheckoutPath::Points
        }
    }
}

/// Conversion between points and cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointExchange {
    pub points_per_yuan: u32,
}

impl Default for PointExchange {
    fn default() -> Self {
        Self {
            points_per_yuan: 100,
        }
    }
}

impl PointExchange {
    pub fn new(points_per_yuan: u32) -> Self {
        Self {
            points_per_yuan: points_per_yuan.max(1),
        }
    }

    pub fn to_yuan(self, points: u32) -> f64 {
        f64::from(points) / f64::from(self.points_per_yuan)
    }

    /// Largest deduction allowed: never more than the balance nor the full price.
    pub fn max_deduction(self, price: u32, balance: u32) -> u32 {
        let price_in_points = price.saturating_mul(self.points_per_yuan);
        balance.min(price_in_points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    Deduct,
    Form,
    Payment,
    Success,
}

impl CheckoutStage {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Deduct => "确认订单",
            Self::Form => "填写预约信息",
            Self::Payment => "微信支付",
            Self::Success => "预约成功",
        }
    }
}

/// Booking contact captured before payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub nickname: String,
    pub phone: String,
    pub address: String,
}

impl ContactForm {
    fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            nickname: require_text("nickname", &self.nickname)?,
            phone: require_text("phone", &self.phone)?,
            address: require_text("address", &self.address)?,
        })
    }
}

/// Outcome of a confirmed hybrid payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub title: String,
    pub points_deducted: u32,
    pub cash_paid: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HybridCheckout {
    item: BenefitItem,
    exchange: PointExchange,
    stage: CheckoutStage,
    deduction: u32,
    contact: Option<ContactForm>,
}

impl HybridCheckout {
    pub fn start(item: BenefitItem, exchange: PointExchange) -> Result<Self, PortalError> {
        if item.checkout_path() != CheckoutPath::Hybrid {
            return Err(PortalError::WrongCheckoutPath(item.id));
        }

        Ok(Self {
            item,
            exchange,
            stage: CheckoutStage::Deduct,
            deduction: 0,
            contact: None,
        })
    }

    pub fn item(&self) -> &BenefitItem {
        &self.item
    }

    pub fn stage(&self) -> CheckoutStage {
        self.stage
    }

    pub fn deduction(&self) -> u32 {
        self.deduction
    }

    pub fn contact(&self) -> Option<&ContactForm> {
        self.contact.as_ref()
    }

    pub fn max_deduction(&self, balance: u32) -> u32 {
        self.exchange.max_deduction(self.item.price, balance)
    }

    /// Cash still owed after the point deduction, in yuan rounded to cents.
    pub fn amount_due(&self) -> f64 {
        let due = f64::from(self.item.price) - self.exchange.to_yuan(self.deduction);
        (due * 100.0).round() / 100.0
    }

    pub fn choose_deduction(&mut self, points: u32, balance: u32) -> Result<(), PortalError> {
        self.expect_stage(CheckoutStage::Deduct)?;
        let maximum = self.max_deduction(balance);
        if points > maximum {
            return Err(PortalError::DeductionOutOfRange {
                requested: points,
                maximum,
            });
        }
        self.deduction = points;
        Ok(())
    }

    pub fn proceed_to_form(&mut self) -> Result<(), PortalError> {
        self.expect_stage(CheckoutStage::Deduct)?;
        self.stage = CheckoutStage::Form;
        Ok(())
    }

    pub fn back_to_deduction(&mut self) -> Result<(), PortalError> {
        self.expect_stage(CheckoutStage::Form)?;
        self.stage = CheckoutStage::Deduct;
        Ok(())
    }

    pub fn submit_contact(&mut self, form: ContactForm) -> Result<(), PortalError> {
        self.expect_stage(CheckoutStage::Form)?;
        self.contact = Some(form.validated()?);
        self.stage = CheckoutStage::Payment;
        Ok(())
    }

    /// Settle the payment. The balance is checked again since it may have moved since
    /// the deduction was chosen.
    pub fn confirm_payment(&mut self, balance: u32) -> Result<PaymentReceipt, PortalError> {
        self.expect_stage(CheckoutStage::Payment)?;
        if self.deduction > balance {
            return Err(PortalError::InsufficientPoints {
                required: self.deduction,
                available: balance,
            });
        }

        self.stage = CheckoutStage::Success;
        Ok(PaymentReceipt {
            title: self.item.title.clone(),
            points_deducted: self.deduction,
            cash_paid: self.amount_due(),
        })
    }

    fn expect_stage(&self, expected: CheckoutStage) -> Result<(), PortalError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(PortalError::InvalidStage {
                expected,
                actual: self.stage,
            })
        }
    }
}
