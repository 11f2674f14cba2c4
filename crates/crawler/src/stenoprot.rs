use scraper::{ElementRef, Html, Selector};

/// Pull one speech out of a transcript page.
///
/// The overview anchor points at an element inside the speech's first
/// paragraph. That paragraph and the following `<p>` siblings belong to the
/// speech, up to the first sibling that carries another anchor or is not a
/// paragraph at all. Each paragraph collapses to one single-spaced line.
///
/// `None` means the anchor is not on the page. A present anchor with no
/// text comes back as an empty string; the caller decides what that means.
pub fn extract_speech(html: &str, anchor: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let target = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().id() == Some(anchor))?;
    let paragraph = enclosing_paragraph(target)?;

    let anchored = Selector::parse("a[id]").expect("static selector");
    let mut parts = Vec::new();
    push_text(&mut parts, &paragraph);
    for sibling in paragraph.next_siblings() {
        let Some(el) = ElementRef::wrap(sibling) else {
            continue;
        };
        if el.value().name() != "p" || el.select(&anchored).next().is_some() {
            break;
        }
        push_text(&mut parts, &el);
    }
    Some(parts.join("\n"))
}

fn enclosing_paragraph<'a>(target: ElementRef<'a>) -> Option<ElementRef<'a>> {
    if target.value().name() == "p" {
        return Some(target);
    }
    target
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "p")
}

fn push_text(parts: &mut Vec<String>, el: &ElementRef<'_>) {
    let text = el
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if !text.is_empty() {
        parts.push(text);
    }
}
