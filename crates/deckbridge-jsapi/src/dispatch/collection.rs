use crate::endpoint::CollectionEndpoint;
use crate::errors::JsApiError;
use crate::response::Response;

use super::Context;

const MISSING_SEARCH: &str = "No search query found";

pub(super) fn handle(ctx: &Context<'_>, op: CollectionEndpoint) -> Result<Response, JsApiError> {
    match op {
        CollectionEndpoint::Undo => {
            let reverted = ctx.col.with_col(|col| {
                if col.undo_available() {
                    col.undo().map(Some)
                } else {
                    Ok(None)
                }
            })?;
            let label = reverted
                .ok_or_else(|| JsApiError::feature_not_available("Undo is not available"))?;
            Response::success(label)
        }
        CollectionEndpoint::Redo => {
            let reverted = ctx.col.with_col(|col| {
                if col.redo_available() {
                    col.redo().map(Some)
                } else {
                    Ok(None)
                }
            })?;
            let label = reverted
                .ok_or_else(|| JsApiError::feature_not_available("Redo is not available"))?;
            Response::success(label)
        }
        CollectionEndpoint::IsUndoAvailable => {
            let available = ctx
                .col
                .with_col(|col| Ok::<_, JsApiError>(col.undo_available()))?;
            Response::success(available)
        }
        CollectionEndpoint::IsRedoAvailable => {
            let available = ctx
                .col
                .with_col(|col| Ok::<_, JsApiError>(col.redo_available()))?;
            Response::success(available)
        }
        CollectionEndpoint::FindCards => {
            let search = ctx.require_string("search", MISSING_SEARCH)?;
            let ids = ctx.col.with_col(|col| col.find_cards(search))?;
            Response::success(ids)
        }
        CollectionEndpoint::FindNotes => {
            let search = ctx.require_string("search", MISSING_SEARCH)?;
            let ids = ctx.col.with_col(|col| col.find_notes(search))?;
            Response::success(ids)
        }
    }
}
