use isru_sim::SimProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    ValidatingScenario,
    CheckingCache,
    LoadingCachedResult,
    GeneratingEnvironment,
    CompilingPlant,
    Simulating,
    SavingResults,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::ValidatingScenario => "validating",
            RunStage::CheckingCache => "checking cache",
            RunStage::LoadingCachedResult => "loading cache",
            RunStage::GeneratingEnvironment => "environment",
            RunStage::CompilingPlant => "compiling",
            RunStage::Simulating => "simulating",
            RunStage::SavingResults => "saving",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub progress: Option<SimProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            progress: None,
        }
    }
}
