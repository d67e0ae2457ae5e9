use crate::collection::{Card, CardId, Collection, Flag, MARKED_TAG};
use crate::endpoint::CardEndpoint;
use crate::errors::JsApiError;
use crate::response::Response;

use super::Context;

pub(super) fn handle(ctx: &Context<'_>, op: CardEndpoint) -> Result<Response, JsApiError> {
    let id = ctx.long("id").map_or(ctx.current_card, CardId);
    match op {
        CardEndpoint::GetId => read(ctx, id, |_, card| Response::success(card.id)),
        CardEndpoint::GetNid => read(ctx, id, |_, card| Response::success(card.note_id)),
        CardEndpoint::GetFlag => read(ctx, id, |_, card| Response::success(card.flag.code())),
        CardEndpoint::GetReps => read(ctx, id, |_, card| Response::success(card.reps)),
        CardEndpoint::GetInterval => read(ctx, id, |_, card| Response::success(card.interval)),
        CardEndpoint::GetFactor => read(ctx, id, |_, card| Response::success(card.ease_factor)),
        CardEndpoint::GetMod => read(ctx, id, |_, card| Response::success(card.modified)),
        CardEndpoint::GetType => read(ctx, id, |_, card| Response::success(card.card_type.code())),
        CardEndpoint::GetDid => read(ctx, id, |_, card| Response::success(card.deck_id)),
        CardEndpoint::GetLeft => read(ctx, id, |_, card| Response::success(card.left)),
        CardEndpoint::GetODid => {
            read(ctx, id, |_, card| Response::success(card.original_deck_id))
        }
        CardEndpoint::GetODue => read(ctx, id, |_, card| Response::success(card.original_due)),
        CardEndpoint::GetQueue => read(ctx, id, |_, card| Response::success(card.queue.code())),
        CardEndpoint::GetLapses => read(ctx, id, |_, card| Response::success(card.lapses)),
        CardEndpoint::GetDue => read(ctx, id, |_, card| Response::success(card.due)),
        CardEndpoint::GetQuestion => read(ctx, id, |col, card| {
            Response::success(col.render_question(card)?)
        }),
        CardEndpoint::GetAnswer => read(ctx, id, |col, card| {
            Response::success(col.render_answer(card)?)
        }),
        CardEndpoint::IsMarked => read(ctx, id, |col, card| {
            Response::success(col.note(card.note_id)?.has_tag(MARKED_TAG))
        }),
        CardEndpoint::GetReviewLogs => read(ctx, id, |col, card| {
            Response::success(col.review_logs(card.id)?)
        }),
        CardEndpoint::Bury => {
            let count = ctx.col.undoable_op("Bury", |col| {
                col.card(id)?;
                col.bury_cards(&[id])
            })?;
            Response::success(count)
        }
        CardEndpoint::Suspend => {
            let count = ctx.col.undoable_op("Suspend", |col| {
                col.card(id)?;
                col.suspend_cards(&[id])
            })?;
            Response::success(count)
        }
        CardEndpoint::Unbury => {
            ctx.col.undoable_op("Unbury", |col| col.unbury_cards(&[id]))?;
            Ok(Response::empty())
        }
        CardEndpoint::Unsuspend => {
            ctx.col
                .undoable_op("Unsuspend", |col| col.unsuspend_cards(&[id]))?;
            Ok(Response::empty())
        }
        CardEndpoint::ResetProgress => {
            ctx.col.undoable_op("Reset Progress", |col| {
                col.forget_cards(&[id], false, false)
            })?;
            Ok(Response::empty())
        }
        CardEndpoint::ToggleFlag => toggle_flag(ctx, id),
    }
}

/// Loads the card and its neighbours under one lock.
fn read<F>(ctx: &Context<'_>, id: CardId, f: F) -> Result<Response, JsApiError>
where
    F: FnOnce(&dyn Collection, &Card) -> Result<Response, JsApiError>,
{
    ctx.col.with_col(|col| {
        let card = col.card(id)?;
        f(&*col, &card)
    })
}

/// Sets the requested flag, or clears it when the card already carries it.
fn toggle_flag(ctx: &Context<'_>, id: CardId) -> Result<Response, JsApiError> {
    let code = ctx.require_long("flag", "Missing flag")?;
    let requested =
        Flag::from_code(code).ok_or_else(|| JsApiError::invalid_input("Invalid flag code"))?;
    ctx.col.undoable_op("Set Flag", |col| {
        let card = col.card(id)?;
        let flag = if card.flag == requested {
            Flag::None
        } else {
            requested
        };
        col.set_user_flag(&[id], flag)
    })?;
    Ok(Response::empty())
}
