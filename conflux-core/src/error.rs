// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for conflux sequences.
//!
//! A [`StreamError`] is the terminal failure a source sequence can report.
//! It travels in-band as [`StreamItem::Error`](crate::StreamItem::Error);
//! the combinators in this workspace convert it into normal completion at
//! their boundary rather than re-raising it to consumers.

/// Terminal failure of a source sequence.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The producing sequence failed.
    #[error("source error: {context}")]
    Source {
        /// Description of what went wrong in the producer.
        context: String,
    },

    /// Custom error from user code.
    ///
    /// Wraps errors produced by user-provided producers and callbacks so they
    /// can travel through a sequence as its terminal item.
    #[error("user error: {0}")]
    User(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StreamError {
    /// Create a source error with the given context.
    pub fn source_error(context: impl Into<String>) -> Self {
        Self::Source {
            context: context.into(),
        }
    }

    /// Wrap a user error.
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::User(Box::new(error))
    }
}

/// Specialized `Result` type for conflux operations.
pub type Result<T> = std::result::Result<T, StreamError>;

impl Clone for StreamError {
    fn clone(&self) -> Self {
        match self {
            Self::Source { context } => Self::Source {
                context: context.clone(),
            },
            // The boxed error cannot be cloned; degrade to its display text.
            Self::User(e) => Self::Source {
                context: format!("user error: {e}"),
            },
        }
    }
}
