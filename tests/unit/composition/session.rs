use super::*;

fn three() -> Vec<TextElement> {
    vec![
        TextElement::new("a"),
        TextElement::new("b"),
        TextElement::new("c"),
    ]
}

fn texts(elements: &[TextElement]) -> Vec<&str> {
    elements.iter().map(|el| el.text.as_str()).collect()
}

#[test]
fn list_ops_do_not_touch_their_input() {
    let list = three();
    let added = add_element(&list, TextElement::new("d"));
    assert_eq!(texts(&added), ["a", "b", "c", "d"]);
    assert_eq!(list.len(), 3);

    let removed = remove_element(&list, &list[1].id);
    assert_eq!(texts(&removed), ["a", "c"]);
    assert_eq!(remove_element(&list, "missing"), list);
}

#[test]
fn update_patches_by_id_and_keeps_the_id() {
    let list = three();
    let id = list[2].id.clone();
    let out = update_element(&list, &id, |el| {
        el.text = "changed".to_owned();
        el.id = "hijack".to_owned();
    });
    assert_eq!(out[2].text, "changed");
    assert_eq!(out[2].id, id);
    assert_eq!(list[2].text, "c");
}

#[test]
fn duplicate_is_offset_and_inserted_after_source() {
    let mut list = three();
    list[0].x = 97.0;
    let out = duplicate_element(&list, &list[0].id);
    assert_eq!(texts(&out), ["a", "a", "b", "c"]);
    assert_ne!(out[1].id, out[0].id);
    assert_eq!(out[1].x, 100.0);
    assert_eq!(out[1].y, 55.0);
}

#[test]
fn reorder_moves_and_checks_bounds() {
    let list = three();
    let out = reorder_element(&list, 0, 2).unwrap();
    assert_eq!(texts(&out), ["b", "c", "a"]);
    assert!(matches!(
        reorder_element(&list, 3, 0),
        Err(ThumbError::Validation(_))
    ));
}

#[test]
fn front_and_back_move_both_list_and_layer() {
    let list = three();
    let out = send_to_back(&list, &list[2].id);
    assert_eq!(texts(&out), ["c", "a", "b"]);
    assert_eq!(out[0].layer_order, LayerOrder::Back);

    let out = bring_to_front(&out, &list[2].id);
    assert_eq!(texts(&out), ["a", "b", "c"]);
    assert_eq!(out[2].layer_order, LayerOrder::Front);
}

#[test]
fn new_session_has_one_seed_element() {
    let session = EditSession::default();
    assert_eq!(session.text_elements().len(), 1);
    let seed = &session.text_elements()[0];
    assert_eq!(seed.text, SEED_TEXT);
    assert_eq!((seed.x, seed.y), (50.0, 50.0));
    assert_eq!(seed.font_size, 72.0);
    assert!(session.filters().is_neutral());
    assert!(!session.can_undo());

    let compact = EditSession::new(&RenderConfig::compact_editor());
    assert_eq!(compact.text_elements()[0].font_size, 120.0);
}

#[test]
fn undo_and_redo_walk_history() {
    let mut s = EditSession::default();
    let id = s.add_element(TextElement::new("second"));
    s.update_element(&id, |el| el.bold = true);
    assert!(s.element(&id).unwrap().bold);

    assert!(s.undo());
    assert!(!s.element(&id).unwrap().bold);
    assert!(s.undo());
    assert!(s.element(&id).is_none());
    assert!(!s.undo());

    assert!(s.redo());
    assert!(s.redo());
    assert!(s.element(&id).unwrap().bold);
    assert!(!s.redo());
}

#[test]
fn new_change_clears_redo() {
    let mut s = EditSession::default();
    s.apply_preset("noir").unwrap();
    assert!(s.undo());
    assert!(s.can_redo());
    s.reset_filters();
    assert!(s.can_redo(), "no-op change leaves history alone");
    s.set_filters(ImageFilter {
        sepia: 10.0,
        ..ImageFilter::default()
    })
    .unwrap();
    assert!(!s.can_redo());
}

#[test]
fn history_is_capped() {
    let mut s = EditSession::from_parts(Vec::new(), ImageFilter::default(), 3);
    for i in 0..10 {
        s.add_element(TextElement::new(format!("t{i}")));
    }
    let mut undos = 0;
    while s.undo() {
        undos += 1;
    }
    assert_eq!(undos, 3);
    assert_eq!(s.text_elements().len(), 7);
}

#[test]
fn invalid_filter_changes_are_rejected() {
    let mut s = EditSession::default();
    assert!(s.apply_preset("unknown").is_err());
    assert!(
        s.set_filters(ImageFilter {
            brightness: f64::NAN,
            ..ImageFilter::default()
        })
        .is_err()
    );
    assert!(!s.can_undo());
}

#[test]
fn duplicate_in_session_returns_copy_id() {
    let mut s = EditSession::default();
    let seed = s.text_elements()[0].id.clone();
    let copy = s.duplicate_element(&seed).unwrap();
    assert_eq!(s.text_elements()[1].id, copy);
    assert!(s.duplicate_element("missing").is_none());
}
