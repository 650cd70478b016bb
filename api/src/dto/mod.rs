pub mod token_dto;

pub use token_dto::RefreshTokenResponse;
pub use tp_shared::ErrorResponse;
