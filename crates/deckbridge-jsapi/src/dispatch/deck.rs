use crate::collection::DeckId;
use crate::endpoint::DeckEndpoint;
use crate::errors::JsApiError;
use crate::response::Response;

use super::Context;

pub(super) fn handle(ctx: &Context<'_>, op: DeckEndpoint) -> Result<Response, JsApiError> {
    let deck = ctx.col.with_col(|col| {
        let id = match ctx.long("id") {
            Some(raw) => DeckId(raw),
            None => col.card(ctx.current_card)?.deck_id,
        };
        col.deck(id)
            .ok_or_else(|| JsApiError::invalid_input(format!("Found no deck with the id '{id}'")))
    })?;
    match op {
        DeckEndpoint::GetId => Response::success(deck.id),
        DeckEndpoint::GetName => Response::success(deck.name),
        DeckEndpoint::IsFiltered => Response::success(deck.filtered),
    }
}
