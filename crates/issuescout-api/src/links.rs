// Link header parsing - GitHub tells us about other pages through rel links
use reqwest::Url;

/// Page numbers advertised by a `Link` response header
///
/// GitHub only includes the relations that make sense for the current page:
/// the first page has no `prev`/`first`, the last page has no `next`/`last`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub first: Option<u32>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
    pub last: Option<u32>,
}

impl PageLinks {
    /// Parse a raw `Link` header value
    ///
    /// Entries look like `<https://api.github.com/...&page=2>; rel="next"`.
    /// Anything we can't make sense of is skipped rather than failing the
    /// whole response.
    pub fn parse(header: &str) -> Self {
        let mut links = PageLinks::default();

        for entry in header.split(',') {
            let mut parts = entry.split(';');

            let Some(target) = parts.next().map(str::trim) else {
                continue;
            };
            let Some(url) = target
                .strip_prefix('<')
                .and_then(|rest| rest.strip_suffix('>'))
            else {
                continue;
            };
            let Some(page) = page_param(url) else {
                continue;
            };

            for param in parts {
                let Some((key, value)) = param.split_once('=') else {
                    continue;
                };
                if key.trim() != "rel" {
                    continue;
                }

                // rel can hold several space separated relation types
                for rel in value.trim().trim_matches('"').split_whitespace() {
                    match rel {
                        "first" => links.first = Some(page),
                        "prev" => links.prev = Some(page),
                        "next" => links.next = Some(page),
                        "last" => links.last = Some(page),
                        _ => {}
                    }
                }
            }
        }

        links
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Pull the `page` query parameter out of a link target
fn page_param(url: &str) -> Option<u32> {
    let url = Url::parse(url).ok()?;
    let page = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())?;
    page.parse().ok()
}
