#[cfg(test)]
mod tests {
    use article_chunker::parser::*;
    use article_chunker::stages::split_sentences;

    use article_chunker::*;

    use std::fs::File;
    use std::io::Read;
    use std::path::Path;
    use test_generator::test_resources;

    fn strip_whitespace(input: &str) -> String {
        return regex::Regex::new(r"\s+")
            .unwrap()
            .replace_all(input, "")
            .to_string();
    }

    fn get_file_content(file_path: &str) -> String {
        let path = Path::new(file_path);
        let mut content = String::new();
        let mut file = File::open(path).unwrap();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn get_article(resource: &str) -> ArticleDetail {
        ArticleDetail::from_json(get_file_content(resource).as_str()).unwrap()
    }

    fn page_template(slots: usize) -> String {
        let slots: String = (0..slots)
            .map(|_| r#"<div class="article-item"></div>"#)
            .collect();
        format!(r#"<div class="article-content">{}</div>"#, slots)
    }

    fn check_coverage(set: &ChunkSet) {
        let packed: String = set.paragraphs.iter().map(|p| p.text.as_str()).collect();
        let rest = fragment_text(&set.remainder);
        assert_eq!(
            strip_whitespace(&format!("{}{}", packed, rest)),
            strip_whitespace(&set.flat_text),
            "paragraphs and remainder must cover the article text exactly once"
        );
    }

    fn check_length_discipline(set: &ChunkSet, options: &ChunkOptions) {
        let sentences = split_sentences(&set.flat_text, options.terminators);
        assert_eq!(sentences.concat(), set.flat_text);
        assert_eq!(sentences.len(), set.sentence_count);

        let mut start = 0;
        let mut used = 0;
        for (i, paragraph) in set.paragraphs.iter().enumerate() {
            let end = start + paragraph.sentence_count;
            let raw_len: usize = sentences[start..end].iter().map(|s| s.chars().count()).sum();
            assert_eq!(raw_len, paragraph.raw_len);

            let target = options.target_for(i);
            let cap = target as f64 * options.overflow_tolerance;
            if paragraph.sentence_count > 1 {
                assert!(raw_len as f64 <= cap, "paragraph {} exceeds its cap", i);
            }
            if raw_len < target {
                match sentences.get(end) {
                    None => {}
                    Some(next) => assert!(
                        (raw_len + next.chars().count()) as f64 > cap,
                        "paragraph {} closed short of its target",
                        i
                    ),
                }
            }
            used += raw_len;
            start = end;
        }
        assert_eq!(start, set.sentence_index);
        assert_eq!(used, set.used_text_length);
    }

    fn test(resource: &str) {
        let article = get_article(resource);
        let options = ChunkOptions::default();
        let result = article.chunk(&options);

        assert_eq!(result, article.chunk(&options), "chunking is deterministic");

        let set = match &result {
            ChunkedArticle::Chunked(set) => set,
            ChunkedArticle::Fallback(html) => {
                let raw: String = article.content.concat();
                if raw.trim().is_empty() {
                    assert_eq!(html, &options.fallback_html);
                } else {
                    assert_eq!(html, &raw);
                    assert!(strip_whitespace(&fragment_text(&parse_fragments(&article.content))).is_empty());
                }
                return;
            }
        };

        assert!(!set.paragraphs.is_empty());
        assert!(set.paragraphs.len() <= options.max_chunks);
        assert_eq!(set.chunks.len(), set.paragraphs.len());
        check_coverage(set);
        check_length_discipline(set, &options);

        let images = parse_fragments(&article.content)
            .iter()
            .any(|n| n.contains_tag("img"));
        assert_eq!(set.chunks[0].elements[0].is_tag("img"), images);

        let placed = place(&page_template(5), &result, &PageLayout::default());
        assert!(!placed.fell_back);
        assert_eq!(placed.slots_filled, set.chunks.len().min(5));
        assert_eq!(placed.remainder_nodes, set.remainder.len());
    }

    #[test_resources("tests/fixtures/*.json")]
    fn run(resource: &str) {
        test(resource);
    }

    #[test]
    fn short_article_becomes_one_chunk_led_by_its_image() {
        let content = vec![
            "<p>Sentence one. Sentence two. </p><img src='a.png'/><p>Sentence three.</p>".to_string(),
        ];
        let article = chunk_article(&content, &ChunkOptions::default());
        let set = article.chunk_set().unwrap();

        assert_eq!(set.flat_text, "Sentence one. Sentence two. Sentence three.");
        assert_eq!(set.sentence_count, 3);
        assert_eq!(set.paragraphs.len(), 1);
        assert_eq!(
            set.chunks[0].to_html(),
            r#"<img src="a.png"><p>Sentence one. Sentence two. Sentence three.</p>"#
        );
        assert!(set.remainder.is_empty());
    }

    #[test]
    fn unpunctuated_text_is_taken_whole_by_the_first_paragraph() {
        let words = vec!["word"; 400].join(" ");
        let content = vec![format!("<p>{}</p>", words)];
        let article = chunk_article(&content, &ChunkOptions::default());
        let set = article.chunk_set().unwrap();

        assert_eq!(set.sentence_count, 1);
        assert_eq!(set.paragraphs.len(), 1);
        assert_eq!(set.paragraphs[0].raw_len, 1999);
        assert_eq!(set.paragraphs[0].text, words);
        assert!(set.remainder.is_empty());
    }

    #[test]
    fn five_slots_take_five_chunks_and_the_remainder_follows_the_last() {
        let article = get_article("tests/fixtures/long_world.json");
        let result = article.chunk(&ChunkOptions::default());
        let set = result.chunk_set().unwrap();
        assert_eq!(set.paragraphs.len(), 5);
        assert!(!set.remainder.is_empty());

        let placed = place(&page_template(5), &result, &PageLayout::default());
        assert_eq!(placed.slots_filled, 5);
        assert_eq!(placed.overflowed_chunks, 0);

        let page = parse_fragment(&placed.html);
        let container = page[0].children();
        for (i, paragraph) in set.paragraphs.iter().enumerate() {
            let slot = container[i].as_element().unwrap();
            assert!(slot.has_class("article-item"));
            let text = fragment_text(&slot.children);
            assert!(text.ends_with(&paragraph.text), "slot {} holds paragraph {}", i, i);
        }
        assert_eq!(
            strip_whitespace(&fragment_text(&container[5..])),
            strip_whitespace(&fragment_text(&set.remainder))
        );
    }

    #[test]
    fn extra_chunks_and_remainder_can_go_inside_the_last_slot() {
        let article = get_article("tests/fixtures/long_world.json");
        let options = ChunkOptions {
            max_chunks: 7,
            ..ChunkOptions::default()
        };
        let result = article.chunk(&options);
        let set = result.chunk_set().unwrap();
        assert_eq!(set.chunks.len(), 7);

        let layout = PageLayout {
            overflow: OverflowMode::InsideLastSlot,
            ..PageLayout::default()
        };
        let placed = place(&page_template(5), &result, &layout);
        assert_eq!(placed.slots_filled, 5);
        assert_eq!(placed.overflowed_chunks, 2);

        let page = parse_fragment(&placed.html);
        let container = page[0].children();
        assert_eq!(container.len(), 5);
        let tail: String = set.paragraphs[4..].iter().map(|p| p.text.as_str()).collect();
        assert_eq!(
            strip_whitespace(&container[4].text_content()),
            strip_whitespace(&format!("{}{}", tail, fragment_text(&set.remainder)))
        );
    }

    #[test]
    fn empty_content_renders_the_fallback_message() {
        let article = get_article("tests/fixtures/empty_content.json");
        let result = article.chunk(&ChunkOptions::default());
        assert!(result.is_fallback());

        let placed = place(&page_template(5), &result, &PageLayout::default());
        assert!(placed.fell_back);
        assert_eq!(placed.html, "<p>Content not available</p>");
    }

    #[test]
    fn full_width_terminators_follow_the_configured_set() {
        let article = get_article("tests/fixtures/full_width.json");
        let wide = article.chunk(&ChunkOptions::default());
        let western = article.chunk(&ChunkOptions {
            terminators: TerminatorSet::Western,
            ..ChunkOptions::default()
        });
        let wide = wide.chunk_set().unwrap();
        let western = western.chunk_set().unwrap();
        assert_eq!(wide.sentence_count, 60);
        assert_eq!(western.sentence_count, 1);
    }

    #[tokio::test]
    async fn detail_page_renders_a_fixture_end_to_end() {
        let feed = r#"[{ "info1": ["World"] }, { "id": "w-2024-118", "title": "Summit talks run late", "type": "World" }]"#;
        let source = StaticSource::new(feed)
            .with_article("w-2024-118", get_file_content("tests/fixtures/long_world.json"));
        let config = SiteConfig {
            page_template: page_template(5),
            ..SiteConfig::default()
        };
        let site = std::sync::Arc::new(SiteContext::new(std::sync::Arc::new(source), config));

        let page = DetailPage::new(site).render("w-2024-118").await;
        assert_eq!(page.headline(), "Summit talks run late");
        match page {
            RenderedPage::Article { category, create_time, placement, .. } => {
                assert_eq!(category.as_deref(), Some("World"));
                assert_eq!(create_time.as_deref(), Some("1714521600"));
                assert_eq!(placement.slots_filled, 5);
                assert!(placement.html.contains(r#"src="lead.jpg""#));
            }
            other => panic!("unexpected page: {:?}", other),
        }
    }
}
