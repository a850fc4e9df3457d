use std::fmt;

/// One of the eleven fixed parts of a War Game Directive, in emission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    MissionBriefing,
    LegalBattlefield,
    AssetAssessment,
    RedTeam,
    SwotMatrix,
    FinancialExposure,
    ScenarioWarGaming,
    LeveragePoints,
    ExecutionRoadmap,
    FinalCounsel,
    Disclaimer,
}

impl Section {
    pub const COUNT: usize = 11;

    pub const ALL: [Section; Self::COUNT] = [
        Self::MissionBriefing,
        Self::LegalBattlefield,
        Self::AssetAssessment,
        Self::RedTeam,
        Self::SwotMatrix,
        Self::FinancialExposure,
        Self::ScenarioWarGaming,
        Self::LeveragePoints,
        Self::ExecutionRoadmap,
        Self::FinalCounsel,
        Self::Disclaimer,
    ];

    /// 1-based part number.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::MissionBriefing => "Mission Briefing",
            Self::LegalBattlefield => "Legal Battlefield Analysis",
            Self::AssetAssessment => "Asset & Intelligence Assessment (Our Forces)",
            Self::RedTeam => "Red Team Analysis (Simulating the Opposition)",
            Self::SwotMatrix => "Strategic SWOT Matrix",
            Self::FinancialExposure => "Financial Exposure & Remedies Analysis",
            Self::ScenarioWarGaming => "Scenario War Gaming",
            Self::LeveragePoints => "Leverage Points & Negotiation Gambit",
            Self::ExecutionRoadmap => "Execution Roadmap",
            Self::FinalCounsel => "Final Counsel Briefing",
            Self::Disclaimer => "Mandatory Disclaimer",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}
