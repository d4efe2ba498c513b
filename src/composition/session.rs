use crate::{
    composition::model::{ImageFilter, LayerOrder, TextElement},
    effects::presets::filter_preset,
    foundation::{
        config::RenderConfig,
        error::{ThumbError, ThumbResult},
    },
};

/// Percentage points a duplicate is shifted on both axes.
pub const DUPLICATE_OFFSET: f64 = 5.0;

/// Text of the element a new session starts with.
pub const SEED_TEXT: &str = "Your Text";

/// `elements` with `element` appended.
pub fn add_element(elements: &[TextElement], element: TextElement) -> Vec<TextElement> {
    let mut out = elements.to_vec();
    out.push(element);
    out
}

/// `elements` without the element `id`.
pub fn remove_element(elements: &[TextElement], id: &str) -> Vec<TextElement> {
    elements.iter().filter(|el| el.id != id).cloned().collect()
}

/// `elements` with `patch` applied to the element `id`. The id itself cannot be patched.
pub fn update_element(
    elements: &[TextElement],
    id: &str,
    patch: impl FnOnce(&mut TextElement),
) -> Vec<TextElement> {
    let mut out = elements.to_vec();
    if let Some(el) = out.iter_mut().find(|el| el.id == id) {
        patch(el);
        el.id = id.to_owned();
    }
    out
}

/// `elements` with a copy of `id` inserted right after it.
///
/// The copy gets a fresh id and is nudged by [`DUPLICATE_OFFSET`] on both axes.
pub fn duplicate_element(elements: &[TextElement], id: &str) -> Vec<TextElement> {
    let mut out = elements.to_vec();
    if let Some(i) = out.iter().position(|el| el.id == id) {
        let mut copy = out[i].duplicate();
        copy.x = (copy.x + DUPLICATE_OFFSET).clamp(0.0, 100.0);
        copy.y = (copy.y + DUPLICATE_OFFSET).clamp(0.0, 100.0);
        out.insert(i + 1, copy);
    }
    out
}

/// `elements` with the entry at `from` moved to index `to`.
pub fn reorder_element(
    elements: &[TextElement],
    from: usize,
    to: usize,
) -> ThumbResult<Vec<TextElement>> {
    let len = elements.len();
    if from >= len || to >= len {
        return Err(ThumbError::validation(format!(
            "cannot move element {from} to {to} in a list of {len}"
        )));
    }
    let mut out = elements.to_vec();
    let el = out.remove(from);
    out.insert(to, el);
    Ok(out)
}

/// Put `id` in front of the cutout and last in paint order.
pub fn bring_to_front(elements: &[TextElement], id: &str) -> Vec<TextElement> {
    let mut out = elements.to_vec();
    if let Some(i) = out.iter().position(|el| el.id == id) {
        let mut el = out.remove(i);
        el.layer_order = LayerOrder::Front;
        out.push(el);
    }
    out
}

/// Put `id` behind the cutout and first in paint order.
pub fn send_to_back(elements: &[TextElement], id: &str) -> Vec<TextElement> {
    let mut out = elements.to_vec();
    if let Some(i) = out.iter().position(|el| el.id == id) {
        let mut el = out.remove(i);
        el.layer_order = LayerOrder::Back;
        out.insert(0, el);
    }
    out
}

#[derive(Clone, Debug, PartialEq)]
struct Snapshot {
    text_elements: Vec<TextElement>,
    filters: ImageFilter,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

/// Editing state owned by the caller: text elements, filters and undo/redo history.
///
/// Every mutating call records the previous state; [`EditSession::undo`] and
/// [`EditSession::redo`] walk that history. Nothing here debounces: callers that stream
/// slider updates should commit once per gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct EditSession {
    text_elements: Vec<TextElement>,
    filters: ImageFilter,
    history: History,
    history_limit: usize,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl EditSession {
    /// Session seeded with one centered element and neutral filters.
    pub fn new(config: &RenderConfig) -> Self {
        let seed = TextElement::default_with(SEED_TEXT, config.default_font_size);
        Self::from_parts(vec![seed], ImageFilter::default(), config.history_limit)
    }

    /// Session over existing state, with empty history.
    pub fn from_parts(
        text_elements: Vec<TextElement>,
        filters: ImageFilter,
        history_limit: usize,
    ) -> Self {
        Self {
            text_elements,
            filters,
            history: History::default(),
            history_limit: history_limit.max(1),
        }
    }

    /// Current elements, in paint order.
    pub fn text_elements(&self) -> &[TextElement] {
        &self.text_elements
    }

    /// Current filter settings.
    pub fn filters(&self) -> &ImageFilter {
        &self.filters
    }

    /// Element with `id`, if present.
    pub fn element(&self, id: &str) -> Option<&TextElement> {
        self.text_elements.iter().find(|el| el.id == id)
    }

    /// Whether [`EditSession::undo`] would do anything.
    pub fn can_undo(&self) -> bool {
        !self.history.undo.is_empty()
    }

    /// Whether [`EditSession::redo`] would do anything.
    pub fn can_redo(&self) -> bool {
        !self.history.redo.is_empty()
    }

    /// Append an element; returns its id.
    pub fn add_element(&mut self, element: TextElement) -> String {
        let id = element.id.clone();
        let next = add_element(&self.text_elements, element);
        self.commit(next, self.filters);
        id
    }

    /// Remove the element `id`.
    pub fn remove_element(&mut self, id: &str) {
        let next = remove_element(&self.text_elements, id);
        self.commit(next, self.filters);
    }

    /// Patch the element `id`.
    pub fn update_element(&mut self, id: &str, patch: impl FnOnce(&mut TextElement)) {
        let next = update_element(&self.text_elements, id, patch);
        self.commit(next, self.filters);
    }

    /// Duplicate the element `id`; returns the copy's id.
    pub fn duplicate_element(&mut self, id: &str) -> Option<String> {
        let next = duplicate_element(&self.text_elements, id);
        let pos = self.text_elements.iter().position(|el| el.id == id)?;
        let copy_id = next[pos + 1].id.clone();
        self.commit(next, self.filters);
        Some(copy_id)
    }

    /// Move the element at `from` to `to`.
    pub fn reorder_element(&mut self, from: usize, to: usize) -> ThumbResult<()> {
        let next = reorder_element(&self.text_elements, from, to)?;
        self.commit(next, self.filters);
        Ok(())
    }

    /// See [`bring_to_front`].
    pub fn bring_to_front(&mut self, id: &str) {
        let next = bring_to_front(&self.text_elements, id);
        self.commit(next, self.filters);
    }

    /// See [`send_to_back`].
    pub fn send_to_back(&mut self, id: &str) {
        let next = send_to_back(&self.text_elements, id);
        self.commit(next, self.filters);
    }

    /// Replace the filter settings.
    pub fn set_filters(&mut self, filters: ImageFilter) -> ThumbResult<()> {
        filters.validate()?;
        self.commit(self.text_elements.clone(), filters);
        Ok(())
    }

    /// Replace the filter settings with a named preset.
    pub fn apply_preset(&mut self, name: &str) -> ThumbResult<()> {
        self.set_filters(filter_preset(name)?)
    }

    /// Return every filter to neutral.
    pub fn reset_filters(&mut self) {
        self.commit(self.text_elements.clone(), ImageFilter::default());
    }

    /// Step back one change. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.history.undo.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.history.redo.push(current);
        self.restore(prev);
        true
    }

    /// Re-apply the last undone change. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.history.undo.push(current);
        self.restore(next);
        true
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text_elements: self.text_elements.clone(),
            filters: self.filters,
        }
    }

    fn restore(&mut self, snap: Snapshot) {
        self.text_elements = snap.text_elements;
        self.filters = snap.filters;
    }

    fn commit(&mut self, text_elements: Vec<TextElement>, filters: ImageFilter) {
        if text_elements == self.text_elements && filters == self.filters {
            return;
        }
        let prev = self.snapshot();
        self.history.undo.push(prev);
        if self.history.undo.len() > self.history_limit {
            let excess = self.history.undo.len() - self.history_limit;
            self.history.undo.drain(..excess);
        }
        self.history.redo.clear();
        self.text_elements = text_elements;
        self.filters = filters;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/session.rs"]
mod tests;
