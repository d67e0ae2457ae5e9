use crate::collection::{Collection, NoteTypeId};
use crate::endpoint::NoteTypeEndpoint;
use crate::errors::JsApiError;
use crate::response::Response;

use super::Context;

pub(super) fn handle(ctx: &Context<'_>, op: NoteTypeEndpoint) -> Result<Response, JsApiError> {
    let note_type = ctx.col.with_col(|col| {
        let id = match ctx.long("id") {
            Some(raw) => NoteTypeId(raw),
            None => current_note_type(&*col, ctx)?,
        };
        col.note_type(id).ok_or_else(|| {
            JsApiError::invalid_input(format!("Found no note type with the id '{id}'"))
        })
    })?;
    match op {
        NoteTypeEndpoint::GetId => Response::success(note_type.id),
        NoteTypeEndpoint::GetName => Response::success(note_type.name),
        NoteTypeEndpoint::IsImageOcclusion => Response::success(note_type.image_occlusion),
        NoteTypeEndpoint::IsCloze => Response::success(note_type.is_cloze()),
        NoteTypeEndpoint::GetFieldNames => Response::success(note_type.field_names),
    }
}

fn current_note_type(col: &dyn Collection, ctx: &Context<'_>) -> Result<NoteTypeId, JsApiError> {
    let card = col.card(ctx.current_card)?;
    Ok(col.note(card.note_id)?.note_type_id)
}
