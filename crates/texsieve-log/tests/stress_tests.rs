use texsieve_log::LogParser;

#[test]
fn test_char_by_char_streaming() {
    let input = include_str!("fixtures/thesis_file_line_error.log");
    let expected = LogParser::new().parse(input);
    assert_eq!(expected.len(), 8);

    let mut parser = LogParser::new();
    let mut diagnostics = Vec::new();

    // Feed one character at a time
    for c in input.chars() {
        let mut buf = [0; 4];
        let s = c.encode_utf8(&mut buf);
        diagnostics.extend(parser.update_drain(s));
    }
    // Finish
    diagnostics.extend(parser.finish());

    assert_eq!(diagnostics, expected);
}

#[test]
fn test_long_runaway_never_terminated() {
    let mut parser = LogParser::new();
    parser.push_line(&format!("Runaway text? {}", "r".repeat(65)));
    for _ in 0..10_000 {
        parser.push_line(&"r".repeat(79));
    }
    assert!(parser.is_collecting());
    assert_eq!(parser.emitted(), 0);

    let diagnostics = parser.finish();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message.len(), 79 * 10_001);
    assert_eq!(diagnostics[0].lines.line_count(), 10_001);
}

#[test]
fn test_many_short_lines() {
    let mut input = String::new();
    for i in 0..5_000 {
        input.push_str(&format!("./main.tex:{i}: Undefined control sequence.\n"));
        input.push_str("Just chatter\n");
    }
    let diagnostics = LogParser::new().parse(&input);
    assert_eq!(diagnostics.len(), 5_000);
    assert_eq!(diagnostics[4_999].location.as_ref().unwrap().line, 4_999);
}

#[test]
fn test_independent_parsers_share_config() {
    use std::sync::Arc;
    use std::thread;
    use texsieve_log::ParserConfig;

    let config = Arc::new(ParserConfig::default());
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let config = Arc::clone(&config);
            thread::spawn(move || {
                let mut parser = LogParser::with_config(config);
                for i in 0..=n {
                    parser.push_line(&format!("run{n}.tex:{i}: failure"));
                }
                parser.finish().len()
            })
        })
        .collect();

    let counts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts, [1, 2, 3, 4]);
}
