// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use blockdoc_engine::models::{Block, BlockKind, InlineMark, MarkType};

/// A page mixing headings, marked paragraphs, list runs and a toggle, repeated
/// `size` times.
#[allow(dead_code)]
pub fn generate_blocks(size: usize) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(size * 8);
    for i in 0..size {
        let id = |name: &str| format!("{name}-{i}");
        blocks.push(Block::with_id(id("h"), BlockKind::Heading2).with_content("Section"));
        blocks.push(generate_marked_paragraph(id("p"), 4));
        for n in 0..3 {
            blocks.push(
                Block::with_id(id(&format!("li{n}")), BlockKind::BulletListItem)
                    .with_content("Bullet point"),
            );
        }
        blocks.push(
            Block::with_id(id("t"), BlockKind::Toggle)
                .with_content("Details")
                .with_children(vec![id("tc").into()]),
        );
        blocks.push(Block::with_id(id("tc"), BlockKind::Paragraph).with_content("Hidden text"));
        blocks.push(Block::with_id(id("d"), BlockKind::Divider));
    }
    blocks
}

/// A paragraph with `words` repetitions of a sentence and a few overlapping marks
/// per repetition.
#[allow(dead_code)]
pub fn generate_marked_paragraph(id: String, words: usize) -> Block {
    let sentence = "Paragraph with some content. ";
    let step = sentence.len();
    let marks = (0..words)
        .flat_map(|w| {
            let base = w * step;
            [
                InlineMark::new(MarkType::Bold, base, base + 9),
                InlineMark::new(MarkType::Italic, base + 5, base + 14),
                InlineMark::link(base + 15, base + 27, format!("https://example.com/{w}")),
            ]
        })
        .collect();
    Block::with_id(id, BlockKind::Paragraph)
        .with_content(sentence.repeat(words))
        .with_marks(marks)
}
