//! Participant capability roles

use serde::{Deserialize, Serialize};

/// Domain of expertise an expert participant speaks for.
///
/// The six built-in kinds carry default keywords and weights; any other
/// string deserializes to [`ExpertKind::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExpertKind {
    Economic,
    Legal,
    Environmental,
    Manufacturing,
    Logistics,
    Infrastructure,
    Custom(String),
}

impl ExpertKind {
    pub fn as_str(&self) -> &str {
        match self {
            ExpertKind::Economic => "economic",
            ExpertKind::Legal => "legal",
            ExpertKind::Environmental => "environmental",
            ExpertKind::Manufacturing => "manufacturing",
            ExpertKind::Logistics => "logistics",
            ExpertKind::Infrastructure => "infrastructure",
            ExpertKind::Custom(s) => s,
        }
    }

    /// All built-in kinds, in default roster order
    pub fn builtin() -> [ExpertKind; 6] {
        [
            ExpertKind::Economic,
            ExpertKind::Legal,
            ExpertKind::Environmental,
            ExpertKind::Manufacturing,
            ExpertKind::Logistics,
            ExpertKind::Infrastructure,
        ]
    }

    /// Scorer weight used when the configuration does not set one.
    ///
    /// Legal and economic voices form the upper tier, infrastructure the lowest.
    pub fn default_weight(&self) -> f64 {
        match self {
            ExpertKind::Economic | ExpertKind::Legal => 0.15,
            ExpertKind::Environmental | ExpertKind::Manufacturing | ExpertKind::Logistics => 0.10,
            ExpertKind::Infrastructure => 0.05,
            ExpertKind::Custom(_) => 0.10,
        }
    }

    /// Domain keywords that make a proposal relevant to this kind
    pub fn default_keywords(&self) -> Vec<String> {
        let words: &[&str] = match self {
            ExpertKind::Economic => &[
                "投资", "成本", "收益", "经济", "市场", "财税", "融资", "investment", "cost",
                "revenue", "economic", "market", "tax", "financing",
            ],
            ExpertKind::Environmental => &[
                "环境", "噪音", "污染", "生态", "碳排放", "环保", "environment", "noise",
                "pollution", "ecolog", "emission", "wildlife",
            ],
            ExpertKind::Legal => &[
                "法律", "法规", "合规", "标准", "监管", "许可", "law", "regulation",
                "compliance", "standard", "oversight", "licen", "permit",
            ],
            ExpertKind::Manufacturing => &[
                "制造", "生产", "技术", "设备", "认证", "产品", "manufactur", "production",
                "technology", "equipment", "certification", "product",
            ],
            ExpertKind::Logistics => &[
                "物流", "配送", "运营", "效率", "空域", "通道", "logistic", "delivery",
                "operation", "efficiency", "airspace", "corridor",
            ],
            ExpertKind::Infrastructure => &[
                "基础设施", "建设", "系统", "平台", "监控", "infrastructure", "construction",
                "system", "platform", "monitoring",
            ],
            ExpertKind::Custom(_) => &[],
        };
        words.iter().map(|w| w.to_string()).collect()
    }
}

impl std::fmt::Display for ExpertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for ExpertKind {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "economic" | "economics" => ExpertKind::Economic,
            "legal" | "compliance" => ExpertKind::Legal,
            "environmental" | "environment" => ExpertKind::Environmental,
            "manufacturing" => ExpertKind::Manufacturing,
            "logistics" => ExpertKind::Logistics,
            "infrastructure" => ExpertKind::Infrastructure,
            _ => ExpertKind::Custom(s),
        }
    }
}

impl From<&str> for ExpertKind {
    fn from(s: &str) -> Self {
        ExpertKind::from(s.to_string())
    }
}

impl From<ExpertKind> for String {
    fn from(kind: ExpertKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Fixed capability role of a participant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    /// Owns the proposal and emits revisions
    Coordinator,
    /// Reviews the proposal from one domain
    Expert(ExpertKind),
}

impl ParticipantRole {
    pub fn is_coordinator(&self) -> bool {
        matches!(self, ParticipantRole::Coordinator)
    }

    pub fn is_expert(&self) -> bool {
        matches!(self, ParticipantRole::Expert(_))
    }

    pub fn expert_kind(&self) -> Option<&ExpertKind> {
        match self {
            ParticipantRole::Expert(kind) => Some(kind),
            ParticipantRole::Coordinator => None,
        }
    }
}

impl std::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticipantRole::Coordinator => write!(f, "coordinator"),
            ParticipantRole::Expert(kind) => write!(f, "{} expert", kind),
        }
    }
}
