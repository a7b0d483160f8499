use rstest::rstest;

use crate::{DenseProviderError, DenseProviderErrorCode};

#[rstest]
#[case(
    DenseProviderError::ColumnNotFound { column: "features".into() },
    DenseProviderErrorCode::ColumnNotFound,
    "DENSE_COLUMN_NOT_FOUND"
)]
#[case(
    DenseProviderError::NullValue { row: 3, value_index: 1 },
    DenseProviderErrorCode::NullValue,
    "DENSE_NULL_VALUE"
)]
#[case(
    DenseProviderError::InvalidNumber { line: 2, position: 0, value: "x".into() },
    DenseProviderErrorCode::InvalidNumber,
    "DENSE_INVALID_NUMBER"
)]
#[case(
    DenseProviderError::InconsistentLineDimension { line: 4, expected: 2, actual: 3 },
    DenseProviderErrorCode::InconsistentLineDimension,
    "DENSE_INCONSISTENT_LINE_DIMENSION"
)]
#[case(
    DenseProviderError::Io(std::io::Error::other("boom")),
    DenseProviderErrorCode::Io,
    "DENSE_IO"
)]
fn codes_are_stable(
    #[case] err: DenseProviderError,
    #[case] code: DenseProviderErrorCode,
    #[case] text: &str,
) {
    assert_eq!(err.code(), code);
    assert_eq!(code.as_str(), text);
    assert_eq!(code.to_string(), text);
}

#[rstest]
fn messages_name_the_location() {
    let err = DenseProviderError::InvalidNumber {
        line: 7,
        position: 2,
        value: "abc".into(),
    };
    let message = err.to_string();
    assert!(message.contains("line 7"));
    assert!(message.contains("`abc`"));
}
