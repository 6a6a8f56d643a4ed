use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Gift, GiftDirection, GiftHistoryItem, RecordId};
use super::error::{require_text, PortalError};

/// Label and icon recorded when a message is sent without a gift attached.
pub const BLESSING_NAME: &str = "祝福";
pub const BLESSING_ICON: &str = "💬";

/// Request to send a gift (or a bare blessing) to a colleague.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftDelivery {
    pub recipient: String,
    #[serde(default)]
    pub gift_id: Option<RecordId>,
    #[serde(default)]
    pub message: String,
}

/// Points a delivery costs the sender.
pub fn delivery_cost(gift: Option<&Gift>) -> u32 {
    gift.map(|gift| gift.points).unwrap_or(0)
}

/// Balance left after paying `cost`, or an error when it does not cover it.
pub fn charge(balance: u32, cost: u32) -> Result<u32, PortalError> {
    balance
        .checked_sub(cost)
        .ok_or(PortalError::InsufficientPoints {
            required: cost,
            available: balance,
        })
}

pub fn sent_entry(
    id: RecordId,
    delivery: &GiftDelivery,
    gift: Option<&Gift>,
    date: NaiveDate,
) -> Result<GiftHistoryItem, PortalError> {
    let counterpart = require_text("recipient", &delivery.recipient)?;
    let (gift_name, gift_icon) = match gift {
        Some(gift) => (gift.name.clone(), gift.icon.clone()),
        None => (BLESSING_NAME.to_string(), BLESSING_ICON.to_string()),
    };

    Ok(GiftHistoryItem {
        id,
        direction: GiftDirection::Sent,
        counterpart,
        gift_name,
        gift_icon,
        points: -i64::from(delivery_cost(gift)),
        message: delivery.message.trim().to_string(),
        date,
    })
}

pub fn received_entry(
    id: RecordId,
    sender: &str,
    gift: &Gift,
    message: &str,
    date: NaiveDate,
) -> GiftHistoryItem {
    GiftHistoryItem {
        id,
        direction: GiftDirection::Received,
        counterpart: sender.to_string(),
        gift_name: gift.name.clone(),
        gift_icon: gift.icon.clone(),
        points: i64::from(gift.points),
        message: message.to_string(),
        date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::domain::GiftKind;

    fn cake() -> Gift {
        Gift {
            id: RecordId::from("g2"),
            kind: GiftKind::Cake,
            name: "蛋糕".to_string(),
            points: 50,
            icon: "🎂".to_string(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 20).expect("valid date")
    }

    fn delivery(recipient: &str) -> GiftDelivery {
        GiftDelivery {
            recipient: recipient.to_string(),
            gift_id: Some(RecordId::from("g2")),
            message: " 生日快乐 ".to_string(),
        }
    }

    #[test]
    fn charge_rejects_short_balance() {
        assert_eq!(charge(100, 50).expect("covered"), 50);
        let error = charge(10, 50).expect_err("short");
        assert!(matches!(
            error,
            PortalError::InsufficientPoints {
                required: 50,
                available: 10
            }
        ));
    }

    #[test]
    fn blessing_costs_nothing() {
        assert_eq!(delivery_cost(None), 0);
        let entry = sent_entry(RecordId::from("h1"), &delivery("王强"), None, date())
            .expect("valid delivery");
        assert_eq!(entry.gift_name, BLESSING_NAME);
        assert_eq!(entry.points, 0);
    }

    #[test]
    fn sent_entry_records_negative_points() {
        let gift = cake();
        let entry = sent_entry(RecordId::from("h2"), &delivery("王强"), Some(&gift), date())
            .expect("valid delivery");
        assert_eq!(entry.direction, GiftDirection::Sent);
        assert_eq!(entry.points, -50);
        assert_eq!(entry.message, "生日快乐");
    }

    #[test]
    fn recipient_is_required() {
        let error = sent_entry(RecordId::from("h3"), &delivery(" "), None, date())
            .expect_err("recipient missing");
        assert!(matches!(error, PortalError::Validation(_)));
    }

    #[test]
    fn received_entry_credits_points() {
        let entry = received_entry(RecordId::from("h4"), "Boss", &cake(), "Great job!", date());
        assert_eq!(entry.direction, GiftDirection::Received);
        assert_eq!(entry.points, 50);
    }
}
