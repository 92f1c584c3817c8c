use classy_ide::{Analysis, Diagnostic, File, Vocabulary};

const VOCABULARY: &str = r#"{
    "screens": { "sm": "640px" },
    "variants": ["hover", "focus"],
    "utilities": [
        "underline",
        "font-bold",
        "text-lg",
        "bg-red-500",
        { "value": "bg-", "interpolation": "string" },
        { "value": "mx-", "interpolation": "number" },
        { "value": "row-span-", "interpolation": "nonzero" }
    ]
}"#;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Diag {
    line: usize,
    message: String,
}

/// Splits `//~ message` annotations off the fixture, keeping line numbers.
fn parse_expectations(fixture: &str) -> (String, Vec<Diag>) {
    let mut text = Vec::new();
    let mut expected = Vec::new();

    for (idx, line) in fixture.lines().enumerate() {
        let Some((code, comment)) = line.split_once("//~") else {
            text.push(line);
            continue;
        };
        text.push(code);
        for message in comment.split(";;").map(str::trim).filter(|message| !message.is_empty()) {
            expected.push(Diag { line: idx + 1, message: message.to_owned() });
        }
    }

    (text.join("\n"), expected)
}

fn collect_actual(analysis: &Analysis, file: File, diagnostics: &[Diagnostic]) -> Vec<Diag> {
    let line_index = file.line_index(analysis.db());
    let mut actual = diagnostics
        .iter()
        .map(|diag| {
            let line = line_index.line_col(diag.range().start()).line as usize + 1;
            Diag { line, message: diag.message().to_owned() }
        })
        .collect::<Vec<_>>();
    actual.sort();
    actual
}

#[track_caller]
fn check(fixture: &str) {
    let analysis = Analysis::new(Vocabulary::from_json(VOCABULARY).unwrap());
    let (text, mut expected) = parse_expectations(fixture);
    let file = analysis.add_file("index.html", text);

    let diagnostics = analysis.diagnostics(file);
    let actual = collect_actual(&analysis, file, &diagnostics);

    expected.sort();
    assert_eq!(expected, actual);
}

#[test]
fn known_rules_are_clean() {
    check(
        r#"
underline hover:font-bold sm:(text-lg focus:underline)
[lang]:underline bg-red-500 bg-[#fff] bg-${color}
-mx-4 mx-0 row-span-2 focus:
"#,
    );
}

#[test]
fn unknown_directive() {
    check(
        r#"
underline text-xxl //~ unknown directive `text-xxl`
hover:(-row-span-0) //~ unknown directive `-row-span-0`
mx-a //~ unknown directive `mx-a`
"#,
    );
}

#[test]
fn unknown_variant_is_reported_once() {
    check(
        r#"
wiggle:(underline font-bold) //~ unknown variant `wiggle:`
hover:active:underline //~ unknown variant `active:`
"#,
    );
}

#[test]
fn variant_and_directive_on_one_line() {
    check(
        r#"
nope:nada //~ unknown variant `nope:` ;; unknown directive `nada`
"#,
    );
}

#[test]
fn diagnostics_follow_edits() {
    use salsa::Setter as _;

    let mut analysis = Analysis::new(Vocabulary::from_json(VOCABULARY).unwrap());
    let file = analysis.add_file("index.html", "underline");
    assert!(analysis.diagnostics(file).is_empty());

    file.set_text(analysis.db_mut()).to("underlined".to_owned());
    let messages = analysis
        .diagnostics(file)
        .iter()
        .map(|diag| diag.message().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(messages, ["unknown directive `underlined`"]);
}
