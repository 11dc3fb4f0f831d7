use leptos::prelude::*;
use thaw::{MessageBar, MessageBarIntent};

use crate::error::WorkflowError;

/// A message shown above the map after an action.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
}

impl From<&WorkflowError> for Notice {
    fn from(err: &WorkflowError) -> Self {
        match err {
            WorkflowError::Store(_) | WorkflowError::GeocoderUnavailable(_) => {
                Notice::Error(err.to_string())
            }
            WorkflowError::NoResultsFound { .. }
            | WorkflowError::OutsideServiceArea { .. }
            | WorkflowError::ValidationFailed(_) => Notice::Warning(err.to_string()),
        }
    }
}

#[component]
pub fn NoticeView(notice: Notice) -> impl IntoView {
    let (intent, text) = match notice {
        Notice::Info(text) => (MessageBarIntent::Info, text),
        Notice::Success(text) => (MessageBarIntent::Success, text),
        Notice::Warning(text) => (MessageBarIntent::Warning, text),
        Notice::Error(text) => (MessageBarIntent::Error, text),
    };

    view! {
        <MessageBar intent=intent>
            {text}
        </MessageBar>
    }
}
