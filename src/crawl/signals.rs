// src/crawl/signals.rs
// =============================================================================
// Site-wide signals derived from the collected page set after traversal:
// orphan pages, duplicate titles/descriptions, and max depth. Pure functions
// over the per-crawl collections, so the BFS scenarios are testable without
// any network.
// =============================================================================

use std::collections::{BTreeMap, HashSet};

use super::CrawledPage;

/// A crawled page is an orphan when it isn't the seed and no crawled page
/// links to it. Being linked only from the seed still counts as linked.
pub fn orphan_pages(
    pages: &[CrawledPage],
    all_linked: &HashSet<String>,
    start_normalized: &str,
) -> Vec<String> {
    pages
        .iter()
        .filter(|p| p.url != start_normalized && !all_linked.contains(&p.url))
        .map(|p| p.url.clone())
        .collect()
}

/// Groups pages by shared non-empty text (title or description) and keeps
/// only groups covering 2+ URLs. Pages with empty text never group.
pub fn duplicate_groups<'a>(
    entries: impl Iterator<Item = (&'a String, &'a String)>,
) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (text, url) in entries {
        if text.is_empty() {
            continue;
        }
        groups.entry(text.clone()).or_default().push(url.clone());
    }
    groups.retain(|_, urls| urls.len() > 1);
    groups
}

/// Largest BFS depth over the crawled pages; 0 for an empty crawl.
pub fn max_depth(pages: &[CrawledPage]) -> usize {
    pages.iter().map(|p| p.depth).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, title: &str, description: &str, links: &[&str], depth: usize) -> CrawledPage {
        CrawledPage {
            url: url.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            status_code: 200,
            internal_links: links.iter().map(|s| s.to_string()).collect(),
            depth,
        }
    }

    fn linked_union(pages: &[CrawledPage]) -> HashSet<String> {
        pages
            .iter()
            .flat_map(|p| p.internal_links.iter().cloned())
            .collect()
    }

    // Seed A links to B and C, B links to C: nothing is orphaned and the
    // deepest page sits one hop from the seed.
    #[test]
    fn test_fully_linked_site_has_no_orphans() {
        let pages = vec![
            page("https://s.com/", "A", "", &["https://s.com/b", "https://s.com/c"], 0),
            page("https://s.com/b", "B", "", &["https://s.com/c"], 1),
            page("https://s.com/c", "C", "", &[], 1),
        ];
        let linked = linked_union(&pages);
        assert!(orphan_pages(&pages, &linked, "https://s.com/").is_empty());
        assert_eq!(max_depth(&pages), 1);
    }

    #[test]
    fn test_unlinked_page_is_orphan_but_seed_never_is() {
        // The seed has no in-links either, but it is excluded by definition
        let pages = vec![
            page("https://s.com/", "Home", "", &["https://s.com/a"], 0),
            page("https://s.com/a", "A", "", &[], 1),
            page("https://s.com/lost", "Lost", "", &[], 1),
        ];
        let linked = linked_union(&pages);
        let orphans = orphan_pages(&pages, &linked, "https://s.com/");
        assert_eq!(orphans, vec!["https://s.com/lost"]);
    }

    #[test]
    fn test_seed_only_in_link_counts_as_linked() {
        let pages = vec![
            page("https://s.com/", "Home", "", &["https://s.com/a"], 0),
            page("https://s.com/a", "A", "", &[], 1),
        ];
        let linked = linked_union(&pages);
        assert!(orphan_pages(&pages, &linked, "https://s.com/").is_empty());
    }

    #[test]
    fn test_duplicate_titles_require_two_urls() {
        let pages = vec![
            page("https://s.com/", "Home", "", &[], 0),
            page("https://s.com/a", "Home", "", &[], 1),
            page("https://s.com/b", "Unique", "", &[], 1),
        ];
        let dups = duplicate_groups(pages.iter().map(|p| (&p.title, &p.url)));
        assert_eq!(dups.len(), 1);
        assert_eq!(
            dups["Home"],
            vec!["https://s.com/".to_string(), "https://s.com/a".to_string()]
        );
    }

    #[test]
    fn test_empty_titles_never_group() {
        let pages = vec![
            page("https://s.com/", "", "", &[], 0),
            page("https://s.com/a", "", "", &[], 1),
            page("https://s.com/b", "", "", &[], 1),
        ];
        let dups = duplicate_groups(pages.iter().map(|p| (&p.title, &p.url)));
        assert!(dups.is_empty());
    }

    #[test]
    fn test_duplicate_descriptions_grouped_separately() {
        let pages = vec![
            page("https://s.com/", "A", "same desc", &[], 0),
            page("https://s.com/a", "B", "same desc", &[], 1),
        ];
        let dups = duplicate_groups(pages.iter().map(|p| (&p.description, &p.url)));
        assert_eq!(dups["same desc"].len(), 2);
    }

    #[test]
    fn test_max_depth_of_empty_crawl_is_zero() {
        assert_eq!(max_depth(&[]), 0);
    }

    #[test]
    fn test_max_depth_tracks_deepest_page() {
        let pages = vec![
            page("https://s.com/", "A", "", &[], 0),
            page("https://s.com/deep", "B", "", &[], 4),
            page("https://s.com/mid", "C", "", &[], 2),
        ];
        assert_eq!(max_depth(&pages), 4);
    }
}
