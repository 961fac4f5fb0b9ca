//! Route handlers for the capture list.
//!
//! Each handler receives the [`RequestContext`] built by the pipeline and
//! passes it explicitly to the repository.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};

use crate::context::RequestContext;
use crate::http::response::{redirect_home, AppError};
use crate::http::server::AppState;
use crate::list;
use crate::pipeline::Form;

/// Form field holding the new item.
pub const ITEM_FIELD: &str = "item";

/// `GET /`: render the list.
pub async fn view_list(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, AppError> {
    let list = list::download(&ctx).await?;
    let html = state.view.render(&list, &ctx.csrf_token, &ctx.domain)?;

    tracing::debug!(items = list.len(), "Rendered list");
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response())
}

/// `POST /`: append the sanitized `item` field.
pub async fn add_item(
    Extension(ctx): Extension<RequestContext>,
    Extension(form): Extension<Form>,
) -> Result<Response, AppError> {
    let Some(item) = form.get(ITEM_FIELD) else {
        return Ok((StatusCode::BAD_REQUEST, "Missing item").into_response());
    };

    list::append_item(item.to_string(), &ctx).await?;
    tracing::info!("Item added");
    Ok(redirect_home(&ctx.domain))
}

/// Parse a delete index. Digit strings too large for `usize` saturate, so
/// they behave like any other out of range index.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(segment.parse().unwrap_or(usize::MAX))
}

/// `POST /delete/{index}`: remove the item at `index`.
pub async fn delete_item(
    Extension(ctx): Extension<RequestContext>,
    Path(segment): Path<String>,
) -> Result<Response, AppError> {
    let Some(index) = parse_index(&segment) else {
        return Ok((StatusCode::BAD_REQUEST, "Invalid index").into_response());
    };

    list::delete_item(index, &ctx).await?;
    tracing::info!(index, "Item deleted");
    Ok(redirect_home(&ctx.domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_index_accepts_digits_only() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("42"), Some(42));
        assert_eq!(parse_index("007"), Some(7));

        for bad in ["", "abc", "-1", "+1", "1.5", " 1", "1e3"] {
            assert_eq!(parse_index(bad), None, "{:?}", bad);
        }
    }

    #[test]
    fn parse_index_saturates_on_overflow() {
        assert_eq!(parse_index("99999999999999999999999"), Some(usize::MAX));
    }
}
