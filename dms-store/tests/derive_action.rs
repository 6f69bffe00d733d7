use dms_store::{assert_category_emitted, Action, ActionCategory, TestHarness};

#[derive(Action, Clone, Debug, PartialEq)]
#[action(infer_categories)]
enum LibraryAction {
    ShelvesLoad(Vec<String>),
    ShelvesDelete { id: u32 },
    CurrentShelfSet(String),
    #[action(category = "search")]
    SearchBooksLoad(Vec<String>),
    #[action(skip_category)]
    BooksClear,
    Refresh,
}

#[test]
fn test_derive_action_names() {
    assert_eq!(LibraryAction::ShelvesLoad(vec![]).name(), "ShelvesLoad");
    assert_eq!(LibraryAction::ShelvesDelete { id: 1 }.name(), "ShelvesDelete");
    assert_eq!(LibraryAction::Refresh.name(), "Refresh");
}

#[test]
fn test_derive_action_categories() {
    assert_eq!(LibraryAction::ShelvesLoad(vec![]).category(), Some("shelves"));
    assert_eq!(
        LibraryAction::ShelvesDelete { id: 3 }.category(),
        Some("shelves")
    );
    assert_eq!(
        LibraryAction::CurrentShelfSet("a".into()).category(),
        Some("current_shelf")
    );
    assert_eq!(
        LibraryAction::SearchBooksLoad(vec![]).category(),
        Some("search")
    );
    assert_eq!(LibraryAction::BooksClear.category(), None);
    assert_eq!(LibraryAction::Refresh.category(), None);
}

#[test]
fn test_derive_category_enum_and_predicates() {
    let action = LibraryAction::ShelvesDelete { id: 9 };
    assert_eq!(action.category_enum(), LibraryActionCategory::Shelves);
    assert!(action.is_shelves());
    assert!(!action.is_search());

    assert_eq!(
        LibraryAction::Refresh.category_enum(),
        LibraryActionCategory::Uncategorized
    );
    assert_eq!(LibraryActionCategory::CurrentShelf.name(), "current_shelf");
    assert_eq!(LibraryActionCategory::all().len(), 4);
}

#[test]
fn test_harness_drains_by_category() {
    let mut harness = TestHarness::<(), LibraryAction>::new(());
    let dispatch = harness.dispatcher();

    dispatch.dispatch(LibraryAction::ShelvesLoad(vec!["fiction".into()]));
    dispatch.dispatch(LibraryAction::Refresh);
    dispatch.dispatch(LibraryAction::ShelvesDelete { id: 2 });

    let shelves = harness.drain_category("shelves");
    assert_eq!(shelves.len(), 2);

    let rest = harness.drain_emitted();
    assert_eq!(rest, vec![LibraryAction::Refresh]);
}

#[test]
fn test_category_assertion_macro() {
    let actions = vec![
        LibraryAction::SearchBooksLoad(vec![]),
        LibraryAction::BooksClear,
    ];
    assert_category_emitted!(actions, "search");
    assert_eq!(ActionCategory::category(&actions[1]), None);
}
