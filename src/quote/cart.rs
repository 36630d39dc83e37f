//! Cart edits as pure functions
//!
//! Each function takes the current rows and returns the next rows; the input
//! is never mutated. An out-of-range index yields an unchanged copy.

use crate::quote::input;
use crate::quote::models::{CameraCartItem, RecordingChoice};

/// A single field edit on a cart row
#[derive(Debug, Clone, PartialEq)]
pub enum CartField {
    Id(String),
    Nombre(String),
    /// Raw user input; normalised before it is stored
    Cantidad(f64),
    Recording(Option<RecordingChoice>),
}

/// Append a new row with id `CAM-{n}`, one camera and local recording
pub fn add_item(items: &[CameraCartItem]) -> Vec<CameraCartItem> {
    let mut next = items.to_vec();
    next.push(CameraCartItem::new(format!("CAM-{}", items.len() + 1)));
    next
}

pub fn remove_item(items: &[CameraCartItem], index: usize) -> Vec<CameraCartItem> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

pub fn update_field(
    items: &[CameraCartItem],
    index: usize,
    field: CartField,
) -> Vec<CameraCartItem> {
    edit_row(items, index, |item| match field {
        CartField::Id(id) => item.id = id,
        CartField::Nombre(nombre) => item.nombre = nombre,
        CartField::Cantidad(raw) => item.cantidad = input::quantity(raw),
        CartField::Recording(choice) => item.selected_recording = choice,
    })
}

/// Add or remove an analytics service id from a row's selection
pub fn toggle_service(
    items: &[CameraCartItem],
    index: usize,
    service_id: u32,
) -> Vec<CameraCartItem> {
    edit_row(items, index, |item| toggle(&mut item.selected_service_ids, service_id))
}

/// Add or remove a solution id from a row's selection
pub fn toggle_solution(
    items: &[CameraCartItem],
    index: usize,
    solution_id: &str,
) -> Vec<CameraCartItem> {
    edit_row(items, index, |item| {
        toggle(&mut item.selected_solution_ids, solution_id.to_string())
    })
}

fn edit_row<F>(items: &[CameraCartItem], index: usize, edit: F) -> Vec<CameraCartItem>
where
    F: FnOnce(&mut CameraCartItem),
{
    let mut next = items.to_vec();
    if let Some(item) = next.get_mut(index) {
        edit(item);
    }
    next
}

fn toggle<T: PartialEq>(selection: &mut Vec<T>, value: T) {
    match selection.iter().position(|v| *v == value) {
        Some(pos) => {
            selection.remove(pos);
        }
        None => selection.push(value),
    }
}
