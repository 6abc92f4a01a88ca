use proximity::StoreError;

pub mod candidate;

pub(crate) fn convert_error(why: sqlx::Error) -> StoreError {
    match why {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        _ => StoreError::Other(Box::new(why)),
    }
}
