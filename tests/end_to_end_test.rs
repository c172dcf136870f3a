use richkit::{
    Config, DirectoryExportSink, EditorController, EditorProps, InlineStyle, Selection,
    ToolbarCommand,
};

const DOC: &str = r#"{"blocks":[
    {"key":"a","text":"Title","type":"unstyled"},
    {"key":"b","text":"Body text","type":"unstyled"}],"entityMap":{}}"#;

#[test]
fn test_edit_then_export_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.export.file_name = "notes.doc".to_string();

    let mut editor =
        EditorController::with_config(EditorProps::new().with_initial_content(DOC), &config);
    editor.set_selection(Selection::within("a", 0, 5));
    editor.dispatch(ToolbarCommand::ToggleInlineStyle(InlineStyle::Underline));

    let mut sink = DirectoryExportSink::new(dir.path());
    let file = editor.export(&mut sink).unwrap();
    assert_eq!(file.file_name, "notes.doc");

    let written = std::fs::read_to_string(dir.path().join("notes.doc")).unwrap();
    assert!(written.contains("<p style=\"text-decoration: underline;\">Title</p>"));
    assert!(written.contains("<p style=\"\">Body text</p>"));
}
