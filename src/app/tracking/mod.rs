mod catalog;
mod playback;
mod process;

pub(crate) use catalog::*;
pub(crate) use playback::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlaybackOutcome {
    pub(crate) success: bool,
    pub(crate) failure_detail: Option<String>,
}

impl PlaybackOutcome {
    pub(crate) fn succeeded() -> Self {
        Self {
            success: true,
            failure_detail: None,
        }
    }

    pub(crate) fn failed(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            failure_detail: Some(detail.into()),
        }
    }
}
