#![no_main]

use libfuzzer_sys::fuzz_target;
use mu_complete::engine::{DocumentId, Workspace};
use mu_syntax::lexer;

fn floor_boundary(text: &str, mut offset: usize) -> usize {
    offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fuzz_target!(|data: &[u8]| {
    // Layout: two position bytes, then the document and the inserted text separated by a NUL.
    let Some((&[a, b], rest)) = data.split_first_chunk::<2>() else {
        return;
    };
    let Ok(s) = std::str::from_utf8(rest) else {
        return;
    };
    let (text, inserted) = s.split_once('\0').unwrap_or((s, ""));

    let start = floor_boundary(text, a as usize * text.len() / 255);
    let end = floor_boundary(text, start + b as usize % 16).max(start);

    let id = DocumentId::from("fuzz.mu");
    let mut workspace = Workspace::default();
    workspace.open(id.clone(), text);
    workspace.on_edit(&id, start..end, inserted).unwrap();

    let snapshot = workspace.snapshot(&id).unwrap();
    assert_eq!(snapshot.tokens(), lexer::lex(snapshot.text()).as_slice());

    let mut fresh = Workspace::default();
    fresh.open(id.clone(), snapshot.text());
    assert_eq!(snapshot.scopes(), fresh.snapshot(&id).unwrap().scopes());

    let _ = workspace.complete(&id, start);
});
