use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Upload,
    Analysis,
    Training,
    Prediction,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Upload, Tab::Analysis, Tab::Training, Tab::Prediction];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Upload => "Upload Data",
            Tab::Analysis => "Data Analysis",
            Tab::Training => "Train Model",
            Tab::Prediction => "Predictions",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Exactly one tab is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabBar {
    active: Tab,
}

impl TabBar {
    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.active = tab;
    }
}
