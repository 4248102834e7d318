use blockdoc_engine::convert::{ConvertOptions, EmptyDocument, from_tree, to_tree};
use blockdoc_engine::editing::{Cmd, Page, check_page, merge_blocks, resolve_overlaps, split_block};
use blockdoc_engine::models::{Block, BlockId, BlockKind, InlineMark, MarkType, Node, text};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn load_fixture(name: &str) -> Node {
    let json = std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.json",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    serde_json::from_str(&json).unwrap()
}

fn roundtrip(blocks: &[Block]) -> Vec<Block> {
    let options = ConvertOptions::default();
    from_tree(&to_tree(blocks, &options), &options)
}

fn ids(blocks: &[Block]) -> Vec<&str> {
    blocks.iter().map(|b| b.id.as_str()).collect()
}

#[test]
fn editor_document_lowers_to_flat_blocks() {
    let blocks = from_tree(&load_fixture("editor_document"), &ConvertOptions::default());

    assert_eq!(blocks.len(), 9);
    assert_eq!(&ids(&blocks)[..7], ["h1", "p1", "t1", "t2", "b1", "b2", "c1"]);
    assert_eq!(
        blocks.iter().map(|b| b.kind).collect::<Vec<_>>(),
        vec![
            BlockKind::Heading2,
            BlockKind::Paragraph,
            BlockKind::TodoItem,
            BlockKind::TodoItem,
            BlockKind::BulletListItem,
            BlockKind::BulletListItem,
            BlockKind::Code,
            BlockKind::Divider,
            BlockKind::Paragraph,
        ]
    );

    let paragraph = &blocks[1];
    assert_eq!(paragraph.content, "See the agenda and ping \nbefore Friday");
    assert_eq!(
        paragraph.marks,
        vec![
            InlineMark::new(MarkType::Bold, 4, 14),
            InlineMark::new(MarkType::Italic, 25, 38),
            InlineMark::link(4, 14, "https://example.com/agenda"),
            InlineMark::new(MarkType::Mention, 24, 24).with_attrs(
                json!({"id": "user-7", "label": "Sam"})
                    .as_object()
                    .cloned()
                    .unwrap()
            ),
        ]
    );

    assert!(blocks[2].checked());
    assert!(!blocks[3].checked());
    assert_eq!(blocks[4].children, vec![BlockId::from("b2")]);
    assert_eq!(blocks[6].property_str("language"), Some("rust"));
    assert_eq!(blocks[8].content, "kept as text");
    assert_eq!(check_page(&blocks), Ok(()));
}

#[test]
fn lowered_document_survives_another_roundtrip() {
    let blocks = from_tree(&load_fixture("editor_document"), &ConvertOptions::default());
    assert_eq!(roundtrip(&blocks), blocks);
}

#[test]
fn roundtrip_preserves_order_kinds_content_and_marks() {
    let blocks = vec![
        Block::with_id("h", BlockKind::Heading1).with_content("Plan"),
        Block::with_id("p", BlockKind::Paragraph)
            .with_content("Hello brave new world")
            .with_marks(vec![
                InlineMark::new(MarkType::Bold, 0, 11),
                InlineMark::new(MarkType::Italic, 6, 15),
                InlineMark::new(MarkType::Bold, 11, 15),
                InlineMark::new(MarkType::Underline, 3, 3),
            ]),
        Block::with_id("n1", BlockKind::NumberedListItem).with_content("one"),
        Block::with_id("n2", BlockKind::NumberedListItem).with_content("two"),
        Block::with_id("b1", BlockKind::BulletListItem).with_content("bullet"),
        Block::with_id("q", BlockKind::Quote)
            .with_content("Quoted\nline")
            .with_marks(vec![InlineMark::new(MarkType::Code, 0, 6)]),
        Block::with_id("x", BlockKind::Callout)
            .with_content("Heads up")
            .with_property("icon", "💡"),
        Block::with_id("e", BlockKind::Equation).with_content("e = mc^2"),
    ];

    let back = roundtrip(&blocks);

    assert_eq!(ids(&back), ids(&blocks));
    for (original, restored) in blocks.iter().zip(&back) {
        assert_eq!(restored.kind, original.kind, "kind of {}", original.id);
        assert_eq!(restored.content, original.content, "content of {}", original.id);
        assert_eq!(restored.properties, original.properties, "properties of {}", original.id);
        assert_eq!(
            restored.marks,
            resolve_overlaps(&original.marks),
            "marks of {}",
            original.id
        );
    }
}

#[test]
fn roundtrip_preserves_nesting() {
    let blocks = vec![
        Block::with_id("t", BlockKind::Toggle)
            .with_content("Details")
            .with_children(vec!["t1".into(), "t2".into()]),
        Block::with_id("t1", BlockKind::Paragraph).with_content("inside"),
        Block::with_id("t2", BlockKind::BulletListItem)
            .with_content("nested bullet")
            .with_children(vec!["t3".into()]),
        Block::with_id("t3", BlockKind::BulletListItem).with_content("deeper"),
        Block::with_id("cols", BlockKind::ColumnLayout)
            .with_children(vec!["left".into(), "right".into()]),
        Block::with_id("left", BlockKind::Column).with_children(vec!["l1".into()]),
        Block::with_id("l1", BlockKind::Paragraph).with_content("left side"),
        Block::with_id("right", BlockKind::Column).with_children(vec!["r1".into()]),
        Block::with_id("r1", BlockKind::Image).with_property("src", "https://example.com/a.png"),
    ];

    assert_eq!(roundtrip(&blocks), blocks);
}

fn mixed_sequence() -> Vec<Block> {
    vec![
        Block::with_id("h", BlockKind::Heading1).with_content("Title"),
        Block::with_id("p", BlockKind::Paragraph).with_content("Body"),
        Block::with_id("b1", BlockKind::BulletListItem).with_content("first"),
        Block::with_id("b2", BlockKind::BulletListItem).with_content("second"),
        Block::with_id("d", BlockKind::Divider),
        Block::with_id("q", BlockKind::Quote).with_content("Said once"),
    ]
}

#[rstest]
#[case::single_paragraph(vec![Block::with_id("p", BlockKind::Paragraph).with_content("Hello world")])]
#[case::three_bullets(vec![
    Block::with_id("i1", BlockKind::BulletListItem).with_content("Item 1"),
    Block::with_id("i2", BlockKind::BulletListItem).with_content("Item 2"),
    Block::with_id("i3", BlockKind::BulletListItem).with_content("Item 3"),
])]
#[case::bold_prefix(vec![
    Block::with_id("p", BlockKind::Paragraph)
        .with_content("Hello world")
        .with_marks(vec![InlineMark::new(MarkType::Bold, 0, 5)]),
])]
#[case::mixed_sequence(mixed_sequence())]
fn representative_sequences_roundtrip_exactly(#[case] blocks: Vec<Block>) {
    assert_eq!(roundtrip(&blocks), blocks);
}

#[test]
fn list_item_and_table_properties_roundtrip() {
    let blocks = vec![
        Block::with_id("t", BlockKind::TodoItem)
            .with_content("Ship it")
            .with_property("checked", true)
            .with_property("color", "red"),
        Block::with_id("b", BlockKind::BulletListItem)
            .with_content("note")
            .with_property("color", "blue"),
        Block::with_id("tbl", BlockKind::Table)
            .with_property("rows", json!([["a"]]))
            .with_property("headerRow", false)
            .with_property("columnWidths", json!([120])),
    ];

    assert_eq!(roundtrip(&blocks), blocks);
}

#[test]
fn repeated_mentions_at_one_offset_survive() {
    let mention = InlineMark::new(MarkType::Mention, 3, 3)
        .with_attrs(json!({"id": "user-7"}).as_object().cloned().unwrap());
    let blocks = vec![
        Block::with_id("p", BlockKind::Paragraph)
            .with_content("hi  there")
            .with_marks(vec![mention.clone(), mention.clone()]),
    ];

    let doc = to_tree(&blocks, &ConvertOptions::default());
    let mentions = doc.content[0]
        .content
        .iter()
        .filter(|n| n.node_type == "mention")
        .count();
    assert_eq!(mentions, 2);
    assert_eq!(roundtrip(&blocks)[0].marks, vec![mention.clone(), mention]);
}

#[test]
fn retyped_toggle_keeps_its_children_through_the_tree() {
    let page = Page::from_blocks(vec![
        Block::with_id("t", BlockKind::Toggle)
            .with_content("More")
            .with_children(vec!["c".into()]),
        Block::with_id("c", BlockKind::Paragraph).with_content("secret"),
    ]);
    let (page, _) = page
        .apply(&Cmd::SetKind {
            id: "t".into(),
            kind: BlockKind::Paragraph,
        })
        .unwrap();

    let back = roundtrip(page.blocks());
    assert_eq!(ids(&back), vec!["t", "c"]);
    assert_eq!(back[1].content, "secret");
}

#[test]
fn consecutive_list_items_group_into_one_list() {
    let blocks = vec![
        Block::with_id("a", BlockKind::BulletListItem).with_content("a"),
        Block::with_id("b", BlockKind::BulletListItem).with_content("b"),
        Block::with_id("p", BlockKind::Paragraph).with_content("break"),
        Block::with_id("c", BlockKind::BulletListItem).with_content("c"),
        Block::with_id("d", BlockKind::TodoItem).with_content("d"),
    ];
    let doc = to_tree(&blocks, &ConvertOptions::default());

    let shape: Vec<(&str, usize)> = doc
        .content
        .iter()
        .map(|n| (n.node_type.as_str(), n.content.len()))
        .collect();
    assert_eq!(
        shape,
        vec![("bulletList", 2), ("paragraph", 1), ("bulletList", 1), ("taskList", 1)]
    );
}

#[rstest]
#[case::omit(EmptyDocument::Omit)]
#[case::empty_paragraph(EmptyDocument::EmptyParagraph)]
fn empty_page_roundtrips_to_one_empty_paragraph(#[case] empty_document: EmptyDocument) {
    let options = ConvertOptions {
        empty_document,
        ..ConvertOptions::default()
    };
    let doc = to_tree(&[], &options);
    assert_eq!(doc.content.len(), 1);

    let blocks = from_tree(&doc, &options);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::Paragraph);
    assert_eq!(blocks[0].content, "");
}

#[test]
fn split_then_merge_restores_block() {
    let block = Block::with_id("p", BlockKind::Heading2)
        .with_content("Hello 😀 world")
        .with_marks(vec![
            InlineMark::new(MarkType::Bold, 2, 10),
            InlineMark::link(0, 5, "https://example.com"),
        ]);

    let mut offsets: Vec<usize> = block
        .content
        .char_indices()
        .map(|(i, _)| text::utf16_len(&block.content[..i]))
        .collect();
    offsets.push(block.content_len());

    for offset in offsets {
        let split = split_block(&block, offset);
        let merged = merge_blocks(&split.before, &split.after);
        assert_eq!(merged.content, block.content, "offset {offset}");
        assert_eq!(merged.kind, block.kind);
        assert_eq!(merged.marks, resolve_overlaps(&block.marks), "offset {offset}");
    }
}

#[test]
fn page_edits_flow_through_to_the_editor_tree() {
    let options = ConvertOptions::default();
    let page = Page::from_tree(&load_fixture("editor_document"), &options);

    let (page, patch) = page
        .apply(&Cmd::SplitBlock {
            id: "t1".into(),
            offset: 4,
        })
        .unwrap();
    let focus = patch.focus.unwrap();
    let (page, _) = page
        .apply(&Cmd::SetKind {
            id: focus.block.clone(),
            kind: BlockKind::TodoItem,
        })
        .unwrap();
    assert_eq!(page.check(), Ok(()));

    let doc = page.to_tree(&options);
    let task_list = doc
        .content
        .iter()
        .find(|n| n.node_type == "taskList")
        .unwrap();
    assert_eq!(task_list.content.len(), 3);

    let reloaded = Page::from_tree(&doc, &options);
    let texts: Vec<&str> = reloaded
        .blocks()
        .iter()
        .filter(|b| b.kind == BlockKind::TodoItem)
        .map(|b| b.content.as_str())
        .collect();
    assert_eq!(texts, vec!["Book", " room", "Send invites"]);
    assert_eq!(reloaded.get(&focus.block).map(|b| b.kind), Some(BlockKind::TodoItem));
}

#[test]
fn tree_json_uses_editor_field_names() {
    let blocks = vec![
        Block::with_id("p", BlockKind::Paragraph)
            .with_content("bold")
            .with_marks(vec![InlineMark::new(MarkType::Bold, 0, 4)]),
    ];
    let value = serde_json::to_value(to_tree(&blocks, &ConvertOptions::default())).unwrap();

    assert_eq!(
        value,
        json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "attrs": {"blockId": "p"},
                "content": [{"type": "text", "text": "bold", "marks": [{"type": "bold"}]}]
            }]
        })
    );
}
