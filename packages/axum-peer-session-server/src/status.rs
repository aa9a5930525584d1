//! Rendering and caching for the `GET /` human status page (spec §4.2,
//! §9 "the status page is cached for a few seconds").
use std::fmt::Write as _;
use std::time::Duration;

use swarmcast_swarm_core::StatusTable;

#[cfg(not(test))]
type CurrentClock = swarmcast_clock::clock::Working;
#[cfg(test)]
type CurrentClock = swarmcast_clock::clock::Stopped;

use swarmcast_clock::clock::Time;

/// A short-lived cache of the rendered status page, so a burst of page
/// loads doesn't walk the swarm once per request.
pub struct StatusCache {
    ttl: Duration,
    cached: Option<(Duration, String)>,
}

impl StatusCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, cached: None }
    }

    /// Returns the cached page if it's still fresh, otherwise renders and
    /// caches a new one from `table`.
    pub fn get_or_render(&mut self, table: &StatusTable) -> String {
        let now = CurrentClock::now();

        if let Some((rendered_at, page)) = &self.cached {
            if now.saturating_sub(*rendered_at) < self.ttl {
                return page.clone();
            }
        }

        let page = render_status_page(table);
        self.cached = Some((now, page.clone()));
        page
    }
}

/// Renders a swarm [`StatusTable`] as a small auto-refreshing HTML page.
#[must_use]
pub fn render_status_page(table: &StatusTable) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>swarmcast</title>\n<meta http-equiv=\"refresh\" content=\"4\">\n");
    html.push_str("<style>table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:2px 6px;font-family:monospace}</style>\n");
    html.push_str("</head>\n<body>\n");

    let _ = writeln!(html, "<p>{} chunks, {} nodes</p>", table.all_hashes.len(), table.nodes.len());
    html.push_str("<table>\n<tr><th>node</th>");
    for hash in &table.all_hashes {
        let _ = write!(html, "<th>{}</th>", short_hash(hash.as_str()));
    }
    html.push_str("<th>dls</th><th>uls</th><th>avg_ul_time</th></tr>\n");

    for row in &table.nodes {
        html.push_str("<tr>");
        let _ = write!(html, "<td>{}</td>", escape(&row.name));
        for possession in &row.possession {
            let cell = if *possession >= 1.0 {
                "#"
            } else if *possession > 0.0 {
                "~"
            } else {
                "."
            };
            let _ = write!(html, "<td>{cell}</td>");
        }
        let avg = row.avg_ul_time.map_or("-1".to_string(), |v| format!("{v:.2}"));
        let _ = write!(html, "<td>{}</td><td>{}</td><td>{avg}</td>", row.dls, row.uls);
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

fn short_hash(hash: &str) -> &str {
    &hash[..hash.len().min(8)]
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
