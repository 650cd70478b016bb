//! Unit tests for MySQL store error mapping

use tp_core::errors::StoreError;

use crate::database::mysql::refresh_token_store::map_write_error;

#[test]
fn test_non_database_errors_are_backend_failures() {
    let err = map_write_error(sqlx::Error::PoolTimedOut, "Failed to save refresh token");

    match err {
        StoreError::Backend { message } => {
            assert!(message.starts_with("Failed to save refresh token"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_row_not_found_is_not_a_duplicate() {
    let err = map_write_error(sqlx::Error::RowNotFound, "insert");
    assert_ne!(err, StoreError::Duplicate);
}
