const NUTRITIONIST_INSTRUCTION: &str = concat!(
    "あなたはプロの管理栄養士・栄養学の専門家です。",
    "ユーザーの健康状態や生活スタイルを想像しつつ、",
    "分かりやすく、具体的な食事アドバイスを日本語で行ってください。",
);

const TRAVEL_PLANNER_INSTRUCTION: &str = concat!(
    "あなたは世界中の観光地・フライト・ホテル事情に詳しい、",
    "プロの旅行プランナーです。ユーザーの希望を踏まえて、",
    "現実的でワクワクする旅程やプランを日本語で提案してください。",
);

const FALLBACK_INSTRUCTION: &str = concat!(
    "あなたは丁寧で分かりやすい日本語で回答する、",
    "汎用的なAIアシスタントです。",
);

/// The expert role the model is asked to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    Nutritionist,
    TravelPlanner,
}

impl Persona {
    pub const ALL: [Persona; 2] =
        [Persona::Nutritionist, Persona::TravelPlanner];

    /// The label shown in the persona selector.
    pub fn label(self) -> &'static str {
        match self {
            Persona::Nutritionist => "栄養・食事の専門家（A）",
            Persona::TravelPlanner => "旅行プランナーの専門家（B）",
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Persona::Nutritionist => NUTRITIONIST_INSTRUCTION,
            Persona::TravelPlanner => TRAVEL_PLANNER_INSTRUCTION,
        }
    }

    /// Parses either a full label or the short code (`A` or `B`).
    pub fn from_selector(selector: &str) -> Option<Self> {
        Self::from_label(selector).or_else(|| {
            match selector.trim().to_ascii_uppercase().as_str() {
                "A" => Some(Persona::Nutritionist),
                "B" => Some(Persona::TravelPlanner),
                _ => None,
            }
        })
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|persona| persona.label() == label)
    }
}

/// Returns the system instruction for a persona label.  Labels that
/// don't name a persona get a generic assistant instruction.
pub fn system_instruction(label: &str) -> &'static str {
    Persona::from_label(label)
        .map(Persona::instruction)
        .unwrap_or(FALLBACK_INSTRUCTION)
}
