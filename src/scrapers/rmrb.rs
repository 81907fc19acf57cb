//! People's Daily (人民日报) archive scraper.
//!
//! Handles the three page kinds of the archive and both of its known
//! HTML templates:
//!
//! - issue index → section links: `#pageList ul div.right_title-name a`
//!   (legacy), falling back to `div.swiper-container div.swiper-slide a`
//!   (redesigned);
//! - section page → article links: `#titleList ul li a` (legacy),
//!   falling back to `ul.news-list li a` (redesigned), keeping only
//!   hrefs that carry the article marker;
//! - article page → [`Article`]: headings from `h3`/`h1`/`h2` in that
//!   priority order, body paragraphs from the one container that both
//!   templates share, `div#ozoom`.
//!
//! # URL Pattern
//!
//! An issue lives at `{base}/html/{Y}-{m}/{d}/nbs.D110000renmrb_01.htm`
//! and all section/article links on it are relative to that directory,
//! so hrefs are resolved against the page they were found on.

use crate::fetch::PageFetcher;
use crate::models::Article;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

/// Root of the online archive.
pub const BASE_URL: &str = "http://paper.people.com.cn/rmrb";

/// Substring that identifies an article href on a section page.
pub const ARTICLE_LINK_MARKER: &str = "nw.D110000renmrb";

/// Title stored when an article page carries no heading at all.
pub const UNTITLED_TITLE: &str = "（无题）";

/// Layout variants for section links on an issue-index page, tried in
/// order until one matches.
static SECTION_VARIANTS: Lazy<[Selector; 2]> = Lazy::new(|| {
    [
        Selector::parse("#pageList ul div.right_title-name a").unwrap(),
        Selector::parse("div.swiper-container div.swiper-slide a").unwrap(),
    ]
});

/// Layout variants for article links on a section page.
static ARTICLE_VARIANTS: Lazy<[Selector; 2]> = Lazy::new(|| {
    [
        Selector::parse("#titleList ul li a").unwrap(),
        Selector::parse("ul.news-list li a").unwrap(),
    ]
});

/// Heading tags in title priority order.
static HEADING_VARIANTS: Lazy<[Selector; 3]> = Lazy::new(|| {
    [
        Selector::parse("h3").unwrap(),
        Selector::parse("h1").unwrap(),
        Selector::parse("h2").unwrap(),
    ]
});

static CONTENT_CONTAINER: Lazy<Selector> = Lazy::new(|| Selector::parse("div#ozoom").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// URL of the issue-index page (section 01) for a date.
pub fn issue_url(base: &str, day: NaiveDate) -> String {
    format!(
        "{base}/html/{}/nbs.D110000renmrb_01.htm",
        day.format("%Y-%m/%d")
    )
}

/// List the section-page URLs of one day's issue.
///
/// Returns an empty vector when the issue page cannot be fetched or
/// matches neither layout variant; the caller decides how loudly to
/// report that.
#[instrument(level = "debug", skip(fetcher, base))]
pub async fn list_sections(fetcher: &PageFetcher, base: &str, day: NaiveDate) -> Vec<String> {
    let url = issue_url(base, day);
    match fetcher.fetch(&url).await {
        Some(html) => parse_section_links(&html, &url),
        None => Vec::new(),
    }
}

/// List the article URLs on one section page.
#[instrument(level = "debug", skip(fetcher))]
pub async fn list_articles(fetcher: &PageFetcher, section_url: &str) -> Vec<String> {
    match fetcher.fetch(section_url).await {
        Some(html) => parse_article_links(&html, section_url),
        None => Vec::new(),
    }
}

/// Parse section links out of an issue-index page.
pub fn parse_section_links(html: &str, page_url: &str) -> Vec<String> {
    collect_links(html, page_url, SECTION_VARIANTS.iter(), |_| true)
}

/// Parse article links out of a section page.
///
/// Hrefs without the article marker (navigation, anchors, back-links)
/// are silently skipped.
pub fn parse_article_links(html: &str, page_url: &str) -> Vec<String> {
    collect_links(html, page_url, ARTICLE_VARIANTS.iter(), |href| {
        href.contains(ARTICLE_LINK_MARKER)
    })
}

/// Run the layout variants in order; the first one that yields at
/// least one resolved link wins. Elements without an href and hrefs
/// that fail to resolve are skipped, not fatal.
fn collect_links<'a>(
    html: &str,
    page_url: &str,
    variants: impl Iterator<Item = &'a Selector>,
    keep: impl Fn(&str) -> bool,
) -> Vec<String> {
    let Ok(page_url) = Url::parse(page_url) else {
        warn!(%page_url, "unparsable page URL; no links resolved");
        return Vec::new();
    };
    let document = Html::parse_document(html);
    for selector in variants {
        let links: Vec<String> = document
            .select(selector)
            .filter_map(|element| element.value().attr("href"))
            .filter(|href| keep(href))
            .filter_map(|href| page_url.join(href).ok())
            .map(|resolved| resolved.to_string())
            .collect();
        if !links.is_empty() {
            return links;
        }
    }
    debug!(page_url = %page_url, "no layout variant matched");
    Vec::new()
}

/// Extract title and body text from an article page.
///
/// The title joins whichever of `h3`/`h1`/`h2` are present; a page
/// with none still extracts, under [`UNTITLED_TITLE`]. The body is
/// non-negotiable: no `div#ozoom`, no paragraphs inside it, or
/// all-whitespace text all yield `None` — an empty record is never
/// produced.
pub fn extract_article(html: &str, url: &str) -> Option<Article> {
    let document = Html::parse_document(html);

    let headings: Vec<String> = HEADING_VARIANTS
        .iter()
        .filter_map(|selector| document.select(selector).next())
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();
    let title = if headings.is_empty() {
        UNTITLED_TITLE.to_string()
    } else {
        headings.join("\n")
    };

    let container = document.select(&CONTENT_CONTAINER).next()?;
    let paragraphs: Vec<String> = container
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .collect();
    if paragraphs.is_empty() {
        return None;
    }
    let content = paragraphs.join("\n").trim().to_string();
    if content.is_empty() {
        return None;
    }

    Some(Article {
        url: url.to_string(),
        title,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUE_URL: &str = "http://paper.people.com.cn/rmrb/html/2023-05/01/nbs.D110000renmrb_01.htm";
    const SECTION_URL: &str =
        "http://paper.people.com.cn/rmrb/html/2023-05/01/nbs.D110000renmrb_02.htm";

    const LEGACY_ISSUE: &str = r#"
        <html><body>
        <div id="pageList"><ul>
            <div class="right_title-name"><a href="nbs.D110000renmrb_01.htm">第01版：要闻</a></div>
            <div class="right_title-name"><a href="nbs.D110000renmrb_02.htm">第02版：要闻</a></div>
        </ul></div>
        </body></html>"#;

    const REDESIGNED_ISSUE: &str = r#"
        <html><body>
        <div class="swiper-container">
            <div class="swiper-slide"><a href="nbs.D110000renmrb_01.htm">第01版：要闻</a></div>
            <div class="swiper-slide"><a href="nbs.D110000renmrb_02.htm">第02版：要闻</a></div>
        </div>
        </body></html>"#;

    const LEGACY_SECTION: &str = r##"
        <html><body>
        <div id="titleList"><ul>
            <li><a href="nw.D110000renmrb_20230501_1-02.htm">头条文章</a></li>
            <li><a href="nw.D110000renmrb_20230501_2-02.htm">二条文章</a>
                <a href="#top">回到顶部</a></li>
            <li><a>缺失链接</a></li>
        </ul></div>
        </body></html>"##;

    const REDESIGNED_SECTION: &str = r##"
        <html><body>
        <ul class="news-list">
            <li><a href="nw.D110000renmrb_20230501_1-02.htm">头条文章</a></li>
            <li><a href="nw.D110000renmrb_20230501_2-02.htm">二条文章</a>
                <a href="#top">回到顶部</a></li>
            <li><a>缺失链接</a></li>
        </ul>
        </body></html>"##;

    #[test]
    fn test_issue_url_zero_pads_month_and_day() {
        let day = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        assert_eq!(issue_url(BASE_URL, day), ISSUE_URL);
    }

    #[test]
    fn test_section_links_legacy_layout() {
        let links = parse_section_links(LEGACY_ISSUE, ISSUE_URL);
        assert_eq!(
            links,
            vec![
                "http://paper.people.com.cn/rmrb/html/2023-05/01/nbs.D110000renmrb_01.htm",
                "http://paper.people.com.cn/rmrb/html/2023-05/01/nbs.D110000renmrb_02.htm",
            ]
        );
    }

    #[test]
    fn test_section_links_identical_across_layouts() {
        assert_eq!(
            parse_section_links(LEGACY_ISSUE, ISSUE_URL),
            parse_section_links(REDESIGNED_ISSUE, ISSUE_URL)
        );
    }

    #[test]
    fn test_section_links_empty_when_no_layout_matches() {
        assert!(parse_section_links("<html><body><p>维护中</p></body></html>", ISSUE_URL).is_empty());
    }

    #[test]
    fn test_article_links_keep_only_marked_hrefs() {
        let links = parse_article_links(LEGACY_SECTION, SECTION_URL);
        assert_eq!(
            links,
            vec![
                "http://paper.people.com.cn/rmrb/html/2023-05/01/nw.D110000renmrb_20230501_1-02.htm",
                "http://paper.people.com.cn/rmrb/html/2023-05/01/nw.D110000renmrb_20230501_2-02.htm",
            ]
        );
    }

    #[test]
    fn test_article_links_identical_across_layouts() {
        let legacy = parse_article_links(LEGACY_SECTION, SECTION_URL);
        let redesigned = parse_article_links(REDESIGNED_SECTION, SECTION_URL);
        assert_eq!(legacy, redesigned);
        assert_eq!(legacy.len(), 2);
    }

    #[test]
    fn test_extract_article_joins_headings_in_priority_order() {
        let html = r#"
            <html><body>
            <h1>主标题</h1>
            <h2>副标题</h2>
            <h3>引题</h3>
            <div id="ozoom"><p>第一段。</p><p>第二段。</p></div>
            </body></html>"#;
        let article = extract_article(html, "http://example.test/a.htm").unwrap();
        assert_eq!(article.title, "引题\n主标题\n副标题");
        assert_eq!(article.content, "第一段。\n第二段。");
        assert_eq!(article.url, "http://example.test/a.htm");
    }

    #[test]
    fn test_extract_article_partial_headings() {
        let html = r#"
            <html><body>
            <h1>只有主标题</h1>
            <div id="ozoom"><p>正文。</p></div>
            </body></html>"#;
        let article = extract_article(html, "u").unwrap();
        assert_eq!(article.title, "只有主标题");
    }

    #[test]
    fn test_extract_article_without_headings_uses_placeholder() {
        let html = r#"<html><body><div id="ozoom"><p>正文。</p></div></body></html>"#;
        let article = extract_article(html, "u").unwrap();
        assert_eq!(article.title, UNTITLED_TITLE);
        assert_eq!(article.content, "正文。");
    }

    #[test]
    fn test_extract_article_fails_without_content_container() {
        let html = r#"<html><body><h1>标题</h1><p>容器外的文字</p></body></html>"#;
        assert!(extract_article(html, "u").is_none());
    }

    #[test]
    fn test_extract_article_fails_with_zero_paragraphs() {
        let html = r#"<html><body><h1>标题</h1><div id="ozoom"><span>非段落</span></div></body></html>"#;
        assert!(extract_article(html, "u").is_none());
    }

    #[test]
    fn test_extract_article_fails_with_whitespace_only_paragraphs() {
        let html = "<html><body><div id=\"ozoom\"><p>  </p><p>\n\t</p></div></body></html>";
        assert!(extract_article(html, "u").is_none());
    }

    #[test]
    fn test_extract_article_trims_field_edges() {
        let html = r#"
            <html><body>
            <h1>  标题带空白  </h1>
            <div id="ozoom"><p>  开头有空白</p><p>结尾有空白  </p></div>
            </body></html>"#;
        let article = extract_article(html, "u").unwrap();
        assert_eq!(article.title, "标题带空白");
        assert_eq!(article.content, "开头有空白\n结尾有空白");
    }
}
