//! Form extractor that reports rejections in the API error format

use axum::{
    extract::{rejection::FormRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form as AxumForm, Json,
};
use serde::de::DeserializeOwned;

use super::error::{ApiErrorDetail, ApiErrorResponse, ApiErrorType};

/// `application/x-www-form-urlencoded` body extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct Form<T>(pub T);

impl<T> Form<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Form rejection rendered as a JSON API error
#[derive(Debug)]
pub struct FormBodyRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for FormBodyRejection {
    fn into_response(self) -> Response {
        let response = ApiErrorResponse {
            error: ApiErrorDetail {
                message: self.message,
                error_type: ApiErrorType::InvalidRequestError,
                code: Some("form_parse_error".to_string()),
            },
        };

        (self.status, Json(response)).into_response()
    }
}

impl<S, T> FromRequest<S> for Form<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = FormBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumForm::<T>::from_request(req, state).await {
            Ok(AxumForm(value)) => Ok(Form(value)),
            Err(rejection) => Err(FormBodyRejection {
                status: rejection.status(),
                message: format_rejection_message(&rejection),
            }),
        }
    }
}

fn format_rejection_message(rejection: &FormRejection) -> String {
    match rejection {
        FormRejection::InvalidFormContentType(_) => {
            "Expected 'application/x-www-form-urlencoded' content type.".to_string()
        }
        FormRejection::FailedToDeserializeForm(err) => {
            format!("Invalid form data: {}", err.body_text())
        }
        FormRejection::FailedToDeserializeFormBody(err) => {
            format!("Invalid form data: {}", err.body_text())
        }
        FormRejection::BytesRejection(err) => {
            format!("Failed to read request body: {}", err.body_text())
        }
        _ => "Invalid form request".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_into_response() {
        let rejection = FormBodyRejection {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Expected form".to_string(),
        };

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_into_inner() {
        let form = Form(42);
        assert_eq!(form.into_inner(), 42);
    }
}
