// Integration tests - a whole session driven by keys and change notifications

mod common;

use common::fixtures::TreeFixture;
use common::tracing::init_tracing_from_env;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use treepick::app::{Focus, Outcome, Session, SessionEvent};
use treepick::artifact::Artifact;
use treepick::config::Config;
use treepick::services::fs::LocalFsBackend;
use treepick::services::watcher::{ChangeEvent, ChangeKind, RecordingWatcher};

fn key(code: KeyCode) -> SessionEvent {
    SessionEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn start(fixture: &TreeFixture) -> Session<RecordingWatcher> {
    init_tracing_from_env();
    Session::new(
        fixture.root(),
        Arc::new(LocalFsBackend::new()),
        RecordingWatcher::new(),
        Config::default(),
    )
}

/// Put the cursor on the visible row with this name
fn goto(session: &mut Session<RecordingWatcher>, name: &str) {
    let id = session
        .view()
        .rows()
        .iter()
        .map(|&(id, _)| id)
        .find(|&id| session.tree().get_node(id).unwrap().name() == name)
        .unwrap_or_else(|| panic!("no visible row named {name}"));
    session.view_mut().set_cursor(id);
}

fn row_names(session: &Session<RecordingWatcher>) -> Vec<(String, usize)> {
    session
        .view()
        .rows()
        .iter()
        .map(|&(id, depth)| {
            (
                session.tree().get_node(id).unwrap().name().to_string(),
                depth,
            )
        })
        .collect()
}

/// Tab to the request, type it, Tab to the button and press Enter
fn submit(session: &mut Session<RecordingWatcher>, request: &str) -> Artifact {
    while session.focus() != Focus::EditingRequest {
        session.handle(key(KeyCode::Tab));
    }
    session.handle(SessionEvent::Paste(request.to_string()));
    session.handle(key(KeyCode::Tab));
    match session.handle(key(KeyCode::Enter)) {
        Outcome::Submit(artifact) => artifact,
        other => panic!("expected submit, got {other:?}"),
    }
}

#[test]
fn test_select_nested_file_and_sibling() {
    let fixture = TreeFixture::new()
        .unwrap()
        .file("a/x.txt", "hi")
        .unwrap()
        .file("b.txt", "bee")
        .unwrap();
    let mut session = start(&fixture);

    goto(&mut session, "a");
    session.handle(key(KeyCode::Enter));
    goto(&mut session, "x.txt");
    session.handle(key(KeyCode::Char(' ')));
    goto(&mut session, "b.txt");
    session.handle(key(KeyCode::Char(' ')));

    let artifact = submit(&mut session, "explain");
    let doc = &artifact.document;

    assert!(doc.starts_with("<file_tree>\n"));
    assert!(doc.contains("── a\n"));
    assert!(doc.contains("└── x.txt\n"));
    assert!(doc.contains("── b.txt\n"));
    assert!(doc.contains(&format!(
        "<file>\n<file_path>{}</file_path>\n<file_content>\nhi\n</file_content>\n</file>\n",
        fixture.path("a/x.txt").display()
    )));
    assert!(doc.contains(&format!(
        "<file>\n<file_path>{}</file_path>\n<file_content>\nbee\n</file_content>\n</file>\n",
        fixture.path("b.txt").display()
    )));
    assert!(doc.ends_with("<user_request>\nexplain\n</user_request>"));
    assert!(artifact.skipped.is_empty());
}

#[test]
fn test_selecting_directory_selects_its_files() {
    let fixture = TreeFixture::new()
        .unwrap()
        .file("a/one.txt", "1")
        .unwrap()
        .file("a/two.txt", "2")
        .unwrap()
        .file("c.txt", "not picked")
        .unwrap();
    let mut session = start(&fixture);

    goto(&mut session, "a");
    session.handle(key(KeyCode::Enter));
    session.handle(key(KeyCode::Char(' ')));

    for name in ["one.txt", "two.txt"] {
        let id = session.tree().find_by_path(&fixture.path(&format!("a/{name}"))).unwrap();
        assert!(session.tree().get_node(id).unwrap().selected);
    }

    let artifact = submit(&mut session, "");
    assert!(artifact.document.contains("<file_content>\n1\n</file_content>"));
    assert!(artifact.document.contains("<file_content>\n2\n</file_content>"));
    assert!(!artifact.document.contains("not picked"));
    assert!(!artifact.document.contains("c.txt"));
}

#[test]
fn test_change_in_collapsed_directory_is_ignored() {
    let fixture = TreeFixture::new()
        .unwrap()
        .file("a/x.txt", "x")
        .unwrap()
        .file("b.txt", "b")
        .unwrap();
    let mut session = start(&fixture);

    // Load `a` once, then collapse it again
    goto(&mut session, "a");
    session.handle(key(KeyCode::Enter));
    session.handle(key(KeyCode::Enter));
    let rows_before = row_names(&session);
    let nodes_before = session.tree().node_count();

    std::fs::write(fixture.path("a/new.txt"), "new").unwrap();
    session.handle(SessionEvent::FsChange(ChangeEvent::new(
        fixture.path("a/new.txt"),
        ChangeKind::Create,
    )));

    assert_eq!(row_names(&session), rows_before);
    assert_eq!(session.tree().node_count(), nodes_before);
}

#[test]
fn test_new_file_in_expanded_directory_appears() {
    let fixture = TreeFixture::new()
        .unwrap()
        .file("a/x.txt", "x")
        .unwrap();
    let mut session = start(&fixture);

    goto(&mut session, "a");
    session.handle(key(KeyCode::Enter));
    goto(&mut session, "x.txt");
    session.handle(key(KeyCode::Char(' ')));

    std::fs::write(fixture.path("a/y.txt"), "y").unwrap();
    session.handle(SessionEvent::FsChange(ChangeEvent::new(
        fixture.path("a/y.txt"),
        ChangeKind::Create,
    )));

    let rows = row_names(&session);
    assert!(rows.contains(&("y.txt".to_string(), 1)));
    // The surviving sibling keeps its selection and the cursor stays put
    let x = session.tree().find_by_path(&fixture.path("a/x.txt")).unwrap();
    assert!(session.tree().get_node(x).unwrap().selected);
    assert_eq!(session.view().cursor(), Some(x));
}

#[test]
fn test_content_write_does_not_reload() {
    let fixture = TreeFixture::new().unwrap().file("a.txt", "a").unwrap();
    let mut session = start(&fixture);

    // A file created behind the tree's back stays invisible on a write event
    std::fs::write(fixture.path("b.txt"), "b").unwrap();
    session.handle(SessionEvent::FsChange(ChangeEvent::new(
        fixture.path("a.txt"),
        ChangeKind::Write,
    )));
    assert_eq!(session.view().rows().len(), 1);

    session.handle(SessionEvent::FsChange(ChangeEvent::new(
        fixture.path("b.txt"),
        ChangeKind::Create,
    )));
    assert_eq!(session.view().rows().len(), 2);
}

#[test]
fn test_removed_directory_drops_its_subtree() {
    let fixture = TreeFixture::new()
        .unwrap()
        .file("gone/deep/f.txt", "f")
        .unwrap()
        .file("keep.txt", "k")
        .unwrap();
    let mut session = start(&fixture);

    goto(&mut session, "gone");
    session.handle(key(KeyCode::Enter));
    goto(&mut session, "deep");
    session.handle(key(KeyCode::Enter));
    assert_eq!(session.view().rows().len(), 4);

    std::fs::remove_dir_all(fixture.path("gone")).unwrap();
    session.handle(SessionEvent::FsChange(ChangeEvent::new(
        fixture.path("gone"),
        ChangeKind::Remove,
    )));

    assert_eq!(row_names(&session), vec![("keep.txt".to_string(), 0)]);
    assert_eq!(session.tree().node_count(), 2);
}

#[test]
fn test_new_directories_are_watched() {
    let fixture = TreeFixture::new().unwrap().dir("a").unwrap();
    let mut session = start(&fixture);
    assert!(session.watcher().watched.contains(&fixture.path("a")));

    std::fs::create_dir(fixture.path("a/inner")).unwrap();
    goto(&mut session, "a");
    session.handle(key(KeyCode::Enter));
    assert!(session.watcher().watched.contains(&fixture.path("a/inner")));
}

#[test]
fn test_quit_paths() {
    let fixture = TreeFixture::new().unwrap().file("a.txt", "a").unwrap();
    let mut session = start(&fixture);

    assert!(matches!(session.handle(key(KeyCode::Char('q'))), Outcome::Quit));

    session.handle(key(KeyCode::Tab));
    session.handle(key(KeyCode::Tab));
    assert_eq!(session.focus(), Focus::ConfirmingSubmit);
    assert!(matches!(session.handle(key(KeyCode::Char('q'))), Outcome::Quit));
}

#[test]
fn test_typed_request_with_newlines() {
    let fixture = TreeFixture::new().unwrap().file("a.txt", "a").unwrap();
    let mut session = start(&fixture);

    session.handle(key(KeyCode::Tab));
    for c in "ab".chars() {
        session.handle(key(KeyCode::Char(c)));
    }
    session.handle(key(KeyCode::Enter));
    session.handle(SessionEvent::Key(KeyEvent::new(
        KeyCode::Char('C'),
        KeyModifiers::SHIFT,
    )));
    session.handle(key(KeyCode::Backspace));
    session.handle(key(KeyCode::Char('d')));
    assert_eq!(session.request().value(), "ab\nd");

    session.handle(key(KeyCode::Tab));
    let Outcome::Submit(artifact) = session.handle(key(KeyCode::Enter)) else {
        panic!("expected submit");
    };
    assert!(artifact
        .document
        .ends_with("<user_request>\nab\nd\n</user_request>"));
    // Nothing selected: empty tree, no file blocks
    assert!(artifact.document.starts_with("<file_tree>\n</file_tree>\n<user_request>"));
}

#[test]
fn test_unreadable_root_leaves_session_usable() {
    let fixture = TreeFixture::new().unwrap();
    let missing = fixture.path("missing");
    let mut session = Session::new(
        &missing,
        Arc::new(LocalFsBackend::new()),
        RecordingWatcher::new(),
        Config::default(),
    );

    assert!(session.view().rows().is_empty());
    assert!(session.status_message().unwrap().starts_with("Cannot read"));
    session.handle(key(KeyCode::Down));
    session.handle(key(KeyCode::Char(' ')));
    assert!(matches!(session.handle(key(KeyCode::Char('q'))), Outcome::Quit));
}
