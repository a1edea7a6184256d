use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn extract_prints_paragraph_text_only() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("page.html");
    std::fs::write(
        &p,
        r#"<html><head><style>p { margin: 0 }</style></head><body>
        <nav>Menu</nav>
        <p>Hello <script>evil()</script> world</p>
        <p>Second
           paragraph.</p>
        </body></html>"#,
    )
    .unwrap();

    Command::new(assert_cmd::cargo::cargo_bin!("wordcloud"))
        .args(["extract", "--file"])
        .arg(&p)
        .assert()
        .success()
        .stdout(predicate::eq("Hello world Second paragraph.\n"));
}

#[test]
fn extract_from_stdin_without_paragraphs_is_empty_line() {
    Command::new(assert_cmd::cargo::cargo_bin!("wordcloud"))
        .args(["extract"])
        .write_stdin("<div>no paragraphs</div>")
        .assert()
        .success()
        .stdout(predicate::eq("\n"));
}

#[test]
fn extract_missing_file_fails() {
    Command::new(assert_cmd::cargo::cargo_bin!("wordcloud"))
        .args(["extract", "--file", "/definitely/not/here.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read /definitely/not/here.html"));
}
