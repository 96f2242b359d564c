//! Rendering a realistic page end to end.

use std::collections::BTreeSet;

use handbook_content::{extract_frontmatter, extract_headings};
use handbook_render::{render_markdown, Action, NoDrawers};

const PAGE: &str = "---
title: Group Fairness
order: 3
---

# Group Fairness

Group metrics compare outcomes across groups. Start with
[nav:Algorithmic Fairness](algorithmic-fairness) if you are new here.

## Statistical Parity

Equal positive rates. See [drawer:Parity Details](parity) and
[sidebar:A Caveat](caveat).

## Equalized Odds (EO)

```text
[nav:Not A Link](nowhere)
```

More reading at <https://fairmlbook.org>.
";

#[test]
fn renders_a_subsection_body() {
    let fm = extract_frontmatter(PAGE);
    let drawers: BTreeSet<String> = ["parity".to_string()].into_iter().collect();
    let page = render_markdown(fm.body(), &drawers);

    assert_eq!(page.title.as_deref(), Some("Group Fairness"));
    assert_eq!(
        page.actions,
        vec![
            Action::Navigate("algorithmic-fairness".into()),
            Action::OpenDrawer("parity".into()),
        ]
    );
    assert_eq!(page.missing_drawers, vec!["caveat".to_string()]);

    assert!(page.html.contains(r#"<h2 id="statistical-parity">"#));
    assert!(page.html.contains(r#"<h2 id="equalized-odds-eo">"#));
    assert!(page.html.contains("[nav:Not A Link](nowhere)"));
    assert!(page.html.contains(r#"href="https://fairmlbook.org""#));
    assert!(!page.html.contains("title: Group Fairness"));
}

#[test]
fn rendered_anchors_match_extracted_headings() {
    let fm = extract_frontmatter(PAGE);
    let page = render_markdown(fm.body(), &NoDrawers);
    let extracted = extract_headings(fm.body(), 2);

    assert_eq!(page.headings, extracted);
    for heading in &extracted {
        assert!(page.html.contains(&format!(r#"id="{}""#, heading.anchor)));
    }
}

#[test]
fn rendered_page_serializes() {
    let page = render_markdown("## One\n\n[nav:Two](two)", &NoDrawers);
    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["headings"][0]["anchor"], "one");
    assert_eq!(json["actions"][0]["action"], "navigate");
}
