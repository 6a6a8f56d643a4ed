//! Demo data the portal boots with.

use chrono::NaiveDate;

use super::domain::{
    BenefitItem, Course, CourseCategory, CoursePermissions, DownloadItem, Employee, EmployeeRole,
    FundFlow, FundRecord, Gift, GiftKind, LeaderboardEntry, NoticeKind, Notification, PointRule,
    RankDimension, RankStandard, RankTrack, RecordId, Trend,
};
use super::services::ServiceEntry;

fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("seed dates are ISO formatted")
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn current_user() -> Employee {
    Employee {
        id: RecordId::from("u1"),
        name: "李明哲".to_string(),
        position: "高级产品经理".to_string(),
        department: "产品部".to_string(),
        level: "F7".to_string(),
        tenure: "3 年 5 个月".to_string(),
        role: EmployeeRole::Supervisor,
        superior_id: Some(RecordId::from("u_boss")),
        rank_track: RankTrack::F,
        rank_level: 7,
        total_points: 5000,
        next_level_progress: 95.0,
        medals: strings(&["🚀", "⭐", "🔥", "🏆"]),
    }
}

pub fn notices() -> Vec<Notification> {
    vec![
        Notification {
            id: RecordId::from("n1"),
            title: "关于 2025 年度秋季职级晋升评审的通知".to_string(),
            date: day("2025-11-19"),
            kind: NoticeKind::Promotion,
            content: "根据公司年度人才发展规划，2025年度秋季职级晋升评审工作即将启动。个人申报：11月20日 - 11月25日；部门初审：11月26日 - 11月30日；述职评审：12月5日 - 12月10日。".to_string(),
            read_count: 1205,
            is_pinned: true,
            publisher: "人力资源部".to_string(),
            expiry_date: Some(day("2025-12-10")),
        },
        Notification {
            id: RecordId::from("n2"),
            title: "年度财务报销流程更新说明".to_string(),
            date: day("2025-11-18"),
            kind: NoticeKind::General,
            content: "财务部对报销系统进行了升级，新的报销流程将于下月1日正式上线，全面推行电子发票归档。".to_string(),
            read_count: 850,
            is_pinned: false,
            publisher: "财务部".to_string(),
            expiry_date: Some(day("2026-01-01")),
        },
        Notification {
            id: RecordId::from("n3"),
            title: "关于开展“技术创新月”活动的预告".to_string(),
            date: day("2025-11-15"),
            kind: NoticeKind::General,
            content: "公司决定将12月定为“技术创新月”，届时将举办黑客马拉松、技术沙龙分享等系列活动。".to_string(),
            read_count: 620,
            is_pinned: false,
            publisher: "技术委员会".to_string(),
            expiry_date: Some(day("2025-11-20")),
        },
    ]
}

fn course(
    id: &str,
    title: &str,
    category: CourseCategory,
    departments: &[&str],
    levels: &[&str],
) -> Course {
    Course {
        id: RecordId::from(id),
        title: title.to_string(),
        category,
        image_url: format!("https://picsum.photos/400/300?course={id}"),
        permissions: CoursePermissions {
            departments: strings(departments),
            levels: strings(levels),
        },
    }
}

pub fn courses() -> Vec<Course> {
    vec![
        course("c1", "企业文化与价值观宣导", CourseCategory::Culture, &["all"], &["all"]),
        course(
            "c2",
            "高效沟通技巧进阶",
            CourseCategory::GeneralSkills,
            &["all"],
            &["P5", "P6", "P7", "P8", "F5", "F6", "F7", "F8"],
        ),
        course(
            "c3",
            "高级Java并发编程实战",
            CourseCategory::ProfessionalSkills,
            &["技术部"],
            &["P6", "P7", "P8", "F6", "F7", "F8"],
        ),
        course(
            "c4",
            "客户投诉处理标准化流程",
            CourseCategory::ProfessionalSkills,
            &["客服部", "运营部"],
            &["all"],
        ),
        course(
            "c5",
            "2025年战略规划解读",
            CourseCategory::Culture,
            &["all"],
            &["P7", "P8", "P9", "F7", "F8", "F9"],
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn ranked(
    id: &str,
    name: &str,
    score: i64,
    department: &str,
    trend: Trend,
    role: EmployeeRole,
    superior: Option<&str>,
    track: RankTrack,
    level: u8,
) -> LeaderboardEntry {
    LeaderboardEntry {
        id: RecordId::from(id),
        rank: 0,
        name: name.to_string(),
        score,
        department: department.to_string(),
        trend: Some(trend),
        role,
        superior_id: superior.map(RecordId::from),
        rank_track: track,
        rank_level: level,
    }
}

/// Leaderboard rows before ranking; the state reranks them on construction.
pub fn leaderboard() -> Vec<LeaderboardEntry> {
    use EmployeeRole::{Manager, Member, Supervisor};
    use RankTrack::{F, G, Y};

    vec![
        ranked("u_boss", "大老板", 12000, "管理部", Trend::Same, Manager, None, Y, 9),
        ranked("u2", "张伟", 9850, "技术部", Trend::Up, Supervisor, Some("u_boss"), F, 7),
        ranked("u3", "王芳", 9720, "运营部", Trend::Same, Supervisor, Some("u_boss"), Y, 6),
        ranked("u4", "李娜", 9540, "客服部", Trend::Up, Member, Some("u3"), G, 4),
        ranked("u5", "刘强", 9300, "技术部", Trend::Down, Member, Some("u2"), F, 5),
        ranked("u6", "陈静", 9150, "产品部", Trend::Up, Member, Some("u1"), F, 6),
        ranked("u7", "杨洋", 8900, "运营部", Trend::Down, Member, Some("u3"), Y, 5),
        ranked("u8", "赵云", 8850, "技术部", Trend::Same, Member, Some("u2"), F, 5),
        ranked("u1", "李明哲", 5000, "产品部", Trend::Same, Supervisor, Some("u_boss"), F, 7),
    ]
}

pub fn service_entries() -> Vec<ServiceEntry> {
    let mut entries = vec![
        ServiceEntry::new("1", "待处理问题", "AlertCircle"),
        ServiceEntry::new("2", "员工内部福利", "Gift"),
        ServiceEntry::new("3", "团队排名", "Trophy"),
        ServiceEntry::new("4", "学习中心", "BookOpen"),
        ServiceEntry::new("5", "财务管理", "PieChart"),
        ServiceEntry::new("6", "资料下载", "Download"),
        ServiceEntry::new("7", "乐捐收支公示", "PiggyBank"),
        ServiceEntry::new("8", "建议&投诉&举报", "MessageSquarePlus"),
    ];
    entries[0].count = Some(12);
    entries
}

fn benefit(id: &str, title: &str, points: u32, price: u32) -> BenefitItem {
    BenefitItem {
        id: RecordId::from(id),
        title: title.to_string(),
        points,
        price,
        image_url: format!("https://picsum.photos/300/300?benefit={id}"),
        description: None,
    }
}

pub fn benefits() -> Vec<BenefitItem> {
    vec![
        benefit("101", "空调清洗员工价", 0, 69),
        benefit("102", "油烟机清洗员工价", 0, 89),
        benefit("103", "洗衣机清洗员工价", 0, 59),
        benefit("104", "滚筒洗衣机深度洗", 10, 0),
        benefit("105", "家用工具箱套装", 2000, 0),
    ]
}

pub fn downloads() -> Vec<DownloadItem> {
    vec![
        DownloadItem {
            id: RecordId::from("d1"),
            title: "内部补贴申请资料".to_string(),
            content: "包含最新的交通补贴、通讯补贴申请表格及填写规范，每月25日前提交至行政部。".to_string(),
            date: day("2025-11-18"),
            category: "全员资料".to_string(),
            is_pinned: true,
            file_name: "2025补贴申请表.pdf".to_string(),
        },
        DownloadItem {
            id: RecordId::from("d2"),
            title: "Q4季度技术考核大纲".to_string(),
            content: "第四季度技术人员技能考核重点范围。".to_string(),
            date: day("2025-11-10"),
            category: "技术".to_string(),
            is_pinned: false,
            file_name: "Q4考核大纲_V2.docx".to_string(),
        },
        DownloadItem {
            id: RecordId::from("d3"),
            title: "客户服务话术规范手册(2025版)".to_string(),
            content: "更新了针对投诉处理的标准回答话术。".to_string(),
            date: day("2025-10-25"),
            category: "客服".to_string(),
            is_pinned: false,
            file_name: "客服话术2025.pdf".to_string(),
        },
    ]
}

pub fn gifts() -> Vec<Gift> {
    [
        ("g1", GiftKind::Lollipop, "棒棒糖", 10, "🍭"),
        ("g2", GiftKind::Cake, "生日蛋糕", 50, "🎂"),
        ("g3", GiftKind::Car, "超级跑车", 500, "🏎️"),
        ("g4", GiftKind::Yacht, "豪华游轮", 1000, "🚢"),
        ("g5", GiftKind::Rocket, "太空火箭", 5000, "🚀"),
    ]
    .into_iter()
    .map(|(id, kind, name, points, icon)| Gift {
        id: RecordId::from(id),
        kind,
        name: name.to_string(),
        points,
        icon: icon.to_string(),
    })
    .collect()
}

pub fn point_rules() -> Vec<PointRule> {
    [
        ("1", "全员", "基础积分规则", "每日签到 +5分；连续签到7天额外 +20分；按时提交周报 +10分/次。"),
        ("2", "全员", "福利兑换规则", "积分可用于员工福利商城兑换商品或服务；积分每自然年年底清零一次。"),
        ("3", "技术", "上门服务规范分", "着装规范 +5分/天；收到客户投诉 -50分/次；好评 +50分/次。"),
        ("4", "技术", "技术等级分", "考取初级证书 +100分；中级证书 +300分；高级证书 +500分。"),
        ("5", "派单", "调度响应分", "3分钟内响应工单 +2分/单；零差错调度月度奖励 +200分。"),
        ("6", "客服", "话术规范", "全天无违规用语 +10分；客户满意度100%月度奖 +100分。"),
        ("7", "运营", "活动策划", "策划活动效果达标 +50分；创新方案被采纳 +80分。"),
    ]
    .into_iter()
    .map(|(id, category, title, content)| PointRule {
        id: RecordId::from(id),
        category: category.to_string(),
        title: title.to_string(),
        content: content.to_string(),
    })
    .collect()
}

fn standard(id: &str, track: RankTrack, level: u8, dimensions: &[(&str, u8, &str)]) -> RankStandard {
    RankStandard {
        id: RecordId::from(id),
        track,
        level,
        dimensions: dimensions
            .iter()
            .map(|(name, weight, description)| RankDimension {
                name: name.to_string(),
                weight: *weight,
                description: description.to_string(),
            })
            .collect(),
    }
}

pub fn rank_standards() -> Vec<RankStandard> {
    vec![
        standard(
            "rs_f8",
            RankTrack::F,
            8,
            &[
                ("专业深度", 40, "领域内的技术权威性"),
                ("技术广度", 20, "跨领域技术理解能力"),
                ("业务贡献", 30, "技术对业务的实际推动"),
                ("人才培养", 10, "导师带徒情况"),
            ],
        ),
        standard(
            "rs_f9",
            RankTrack::F,
            9,
            &[
                ("行业影响力", 40, "外部技术大会演讲等"),
                ("战略规划", 30, "技术战略制定"),
                ("组织建设", 30, "技术团队梯队建设"),
            ],
        ),
        standard(
            "rs_y7",
            RankTrack::Y,
            7,
            &[
                ("团队绩效", 50, "KPI完成率"),
                ("团队建设", 30, "人员招聘与留存"),
                ("跨部门协作", 20, "资源协调能力"),
            ],
        ),
        standard(
            "rs_g5",
            RankTrack::G,
            5,
            &[
                ("执行力", 60, "任务按时交付率"),
                ("通用技能", 20, "办公软件及沟通能力"),
                ("企业文化", 20, "价值观符合度"),
            ],
        ),
    ]
}

fn income(id: &str, department: &str, month: &str, amount: i64) -> FundRecord {
    FundRecord {
        id: RecordId::from(id),
        month: month.to_string(),
        amount,
        flow: FundFlow::Income {
            department: Some(department.to_string()),
        },
        invoice_images: Vec::new(),
        product_images: Vec::new(),
    }
}

fn expense(
    id: &str,
    expense_type: &str,
    project: &str,
    month: &str,
    needed: i64,
    amount: i64,
    images: (&[&str], &[&str]),
) -> FundRecord {
    let picture = |tag: &&str| format!("https://picsum.photos/300/300?random={tag}");
    FundRecord {
        id: RecordId::from(id),
        month: month.to_string(),
        amount,
        flow: FundFlow::Expense {
            expense_type: Some(expense_type.to_string()),
            project: Some(project.to_string()),
            needed_amount: Some(needed),
        },
        invoice_images: images.0.iter().map(picture).collect(),
        product_images: images.1.iter().map(picture).collect(),
    }
}

pub fn fund_records() -> Vec<FundRecord> {
    vec![
        income("inc1", "技术部", "1月", 500),
        income("inc2", "技术部", "2月", 450),
        income("inc3", "客服部", "1月", 300),
        income("inc4", "客服部", "2月", 320),
        income("inc5", "运营部", "1月", 200),
        income("inc6", "运营部", "2月", 210),
        income("inc7", "产品部", "1月", 150),
        income("inc8", "产品部", "2月", 160),
        expense("exp1", "活动支出", "下午茶", "1月", 800, 800, (&["901"], &["902"])),
        expense("exp2", "活动支出", "下午茶", "2月", 800, 750, (&["903"], &["904"])),
        expense("exp3", "公益捐赠", "流浪动物救助", "1月", 500, 500, (&["905"], &["906", "907"])),
        expense("exp4", "公益捐赠", "流浪动物救助", "2月", 500, 500, (&["908"], &["909"])),
    ]
}
