// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::StreamError;

/// A sequence item that is either a value or the terminal failure of its
/// producer.
///
/// Sources hand their items to the combinators in this workspace as
/// `StreamItem<T>`, which lets a producer report a fault in-band. Following
/// Rx-style semantics, an `Error` item is the last item a well-behaved source
/// produces.
#[derive(Debug, Clone)]
pub enum StreamItem<T> {
    /// A successful value.
    Value(T),
    /// An error that terminates the sequence.
    Error(StreamError),
}

impl<T: PartialEq> PartialEq for StreamItem<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StreamItem::Value(a), StreamItem::Value(b)) => a == b,
            _ => false, // Errors are never equal
        }
    }
}

impl<T: Eq> Eq for StreamItem<T> {}

impl<T> StreamItem<T> {
    /// Returns `true` if this is a `Value`.
    pub const fn is_value(&self) -> bool {
        matches!(self, StreamItem::Value(_))
    }

    /// Returns `true` if this is an `Error`.
    pub const fn is_error(&self) -> bool {
        matches!(self, StreamItem::Error(_))
    }

    /// Converts from `StreamItem<T>` to `Option<T>`, discarding errors.
    pub fn ok(self) -> Option<T> {
        match self {
            StreamItem::Value(v) => Some(v),
            StreamItem::Error(_) => None,
        }
    }

    /// Converts from `StreamItem<T>` to `Option<StreamError>`, discarding values.
    pub fn err(self) -> Option<StreamError> {
        match self {
            StreamItem::Value(_) => None,
            StreamItem::Error(e) => Some(e),
        }
    }

    /// Maps a `StreamItem<T>` to `StreamItem<U>` by applying a function to the
    /// contained value. Errors are propagated unchanged.
    pub fn map<U, F>(self, f: F) -> StreamItem<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            StreamItem::Value(v) => StreamItem::Value(f(v)),
            StreamItem::Error(e) => StreamItem::Error(e),
        }
    }

    /// Returns the contained value.
    ///
    /// # Panics
    ///
    /// Panics if the item is an `Error`.
    pub fn unwrap(self) -> T {
        match self {
            StreamItem::Value(v) => v,
            StreamItem::Error(e) => {
                panic!("called `StreamItem::unwrap()` on an `Error` value: {e:?}")
            }
        }
    }

    /// Returns the contained value, panicking with a custom message if the
    /// item is an `Error`.
    ///
    /// # Panics
    ///
    /// Panics with the provided message if the item is an `Error`.
    pub fn expect(self, msg: &str) -> T {
        match self {
            StreamItem::Value(v) => v,
            StreamItem::Error(e) => panic!("{msg}: {e:?}"),
        }
    }
}

impl<T> From<crate::Result<T>> for StreamItem<T> {
    fn from(result: crate::Result<T>) -> Self {
        match result {
            Ok(v) => StreamItem::Value(v),
            Err(e) => StreamItem::Error(e),
        }
    }
}

impl<T> From<StreamItem<T>> for crate::Result<T> {
    fn from(item: StreamItem<T>) -> Self {
        match item {
            StreamItem::Value(v) => Ok(v),
            StreamItem::Error(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_item() -> StreamItem<i32> {
        StreamItem::Error(StreamError::source_error("boom"))
    }

    #[test]
    fn test_ok_and_err_split_the_variants() {
        assert_eq!(StreamItem::Value(1).ok(), Some(1));
        assert_eq!(StreamItem::Value(1).err().map(|e| e.to_string()), None);
        assert_eq!(error_item().ok(), None);
        assert!(error_item().err().is_some());
    }

    #[test]
    fn test_map_transforms_values_and_keeps_errors() {
        assert_eq!(StreamItem::Value(2).map(|v| v * 10), StreamItem::Value(20));
        assert!(error_item().map(|v| v * 10).is_error());
    }

    #[test]
    fn test_errors_never_compare_equal() {
        assert_eq!(StreamItem::Value(1), StreamItem::Value(1));
        assert_ne!(StreamItem::Value(1), StreamItem::Value(2));
        assert_ne!(error_item(), error_item());
    }

    #[test]
    fn test_round_trip_through_result() {
        let ok: crate::Result<i32> = StreamItem::Value(1).into();
        assert_eq!(ok.unwrap(), 1);

        let item = StreamItem::from(Err::<i32, _>(StreamError::source_error("boom")));
        assert!(item.is_error());
    }
}
