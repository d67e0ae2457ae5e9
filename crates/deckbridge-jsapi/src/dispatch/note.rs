use crate::collection::{Collection, CollectionError, MARKED_TAG, NoteId};
use crate::endpoint::NoteEndpoint;
use crate::errors::JsApiError;
use crate::response::Response;

use super::Context;

pub(super) fn handle(ctx: &Context<'_>, op: NoteEndpoint) -> Result<Response, JsApiError> {
    match op {
        NoteEndpoint::GetId => {
            let id = ctx.col.with_col(|col| note_id(&*col, ctx))?;
            Response::success(id)
        }
        NoteEndpoint::GetNoteTypeId => {
            let note_type = ctx.col.with_col(|col| {
                let id = note_id(&*col, ctx)?;
                col.note(id).map(|note| note.note_type_id)
            })?;
            Response::success(note_type)
        }
        NoteEndpoint::GetCardIds => {
            let cards = ctx.col.with_col(|col| {
                let id = note_id(&*col, ctx)?;
                col.note_card_ids(id)
            })?;
            Response::success(cards)
        }
        NoteEndpoint::GetTags => {
            let tags = ctx.col.with_col(|col| {
                let id = note_id(&*col, ctx)?;
                col.note(id).map(|note| note.string_tags())
            })?;
            Response::success(tags)
        }
        NoteEndpoint::Bury => {
            let count = ctx.col.undoable_op("Bury", |col| {
                let id = note_id(&*col, ctx)?;
                col.bury_notes(&[id])
            })?;
            Response::success(count)
        }
        NoteEndpoint::Suspend => {
            let count = ctx.col.undoable_op("Suspend", |col| {
                let id = note_id(&*col, ctx)?;
                col.suspend_notes(&[id])
            })?;
            Response::success(count)
        }
        NoteEndpoint::SetTags => {
            let tags = ctx.require_string("tags", "Missing tags")?;
            ctx.col.undoable_op("Update Tags", |col| {
                let mut note = col.note(note_id(&*col, ctx)?)?;
                note.set_tags_from_str(tags);
                col.update_note(&note)
            })?;
            Ok(Response::empty())
        }
        NoteEndpoint::ToggleMark => {
            ctx.col.undoable_op("Toggle Mark", |col| {
                let mut note = col.note(note_id(&*col, ctx)?)?;
                if note.has_tag(MARKED_TAG) {
                    note.remove_tag(MARKED_TAG);
                } else {
                    note.add_tag(MARKED_TAG);
                }
                col.update_note(&note)
            })?;
            Ok(Response::empty())
        }
    }
}

/// The `id` from the payload, or the note of the current card.
fn note_id(col: &dyn Collection, ctx: &Context<'_>) -> Result<NoteId, CollectionError> {
    match ctx.long("id") {
        Some(raw) => Ok(NoteId(raw)),
        None => col.card(ctx.current_card).map(|card| card.note_id),
    }
}
