//! HTML dashboard page with a D3.js gauge and the celebration overlay

use crate::config::Media;
use crate::presenter::Region;
use crate::report::Dashboard;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, dashboard: &Dashboard) -> io::Result<()> {
    let state = &dashboard.state;
    let json_data = script_json(&serde_json::to_string(dashboard)?);
    let region_ids = build_region_ids();

    let logos: Vec<String> = dashboard
        .logos
        .iter()
        .map(|url| format!(r#"<img class="logo-img" src="{}" alt="">"#, escape(url)))
        .collect();

    let overlay_background = match (dashboard.media, &dashboard.media_url) {
        (Media::Image, Some(url)) => format!(
            "background: rgba(0, 0, 0, 0.5) url('{}') center no-repeat; background-size: cover;",
            css_url(url)
        ),
        _ => "background: rgba(0, 0, 0, 0.5);".to_string(),
    };

    let video = match (dashboard.media, &dashboard.media_url) {
        (Media::Video, Some(url)) => format!(
            r#"<video id="{id}" src="{src}" autoplay muted loop playsinline style="display: {display}"></video>"#,
            id = Region::Video.element_id(),
            src = escape(url),
            display = state.display_style(Region::Video)
        ),
        _ => String::new(),
    };

    write!(writer, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>
        :root {{
            --bg: #0d1117;
            --card: #161b22;
            --border: #30363d;
            --text: #e6edf3;
            --dim: #7d8590;
            --bar: {bar_color};
            --accent: #58a6ff;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }}
        .container {{ max-width: 1200px; margin: 0 auto; padding: 2rem; }}

        /* Header */
        h1 {{
            text-align: center;
            font-size: 2.5rem;
            font-weight: 800;
            margin-bottom: 1rem;
        }}
        .top-bar {{
            display: flex;
            justify-content: space-between;
            align-items: center;
            gap: 1rem;
            margin-bottom: 2rem;
            padding-bottom: 1rem;
            border-bottom: 1px solid var(--border);
        }}
        .logo-img {{ max-height: 96px; max-width: 30%; object-fit: contain; }}

        /* Stats Row */
        .stats {{
            display: grid;
            grid-template-columns: repeat(4, 1fr);
            gap: 1rem;
            margin-bottom: 2rem;
        }}
        .stat {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
            text-align: center;
        }}
        .stat-value {{ font-size: 2.5rem; font-weight: 700; line-height: 1; }}
        .stat-label {{ color: var(--dim); font-size: 0.875rem; text-transform: uppercase; letter-spacing: 0.05em; margin-top: 0.5rem; }}
        .stat.completed .stat-value {{ color: var(--bar); }}

        /* Gauge */
        .chart-card {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
        }}
        .chart-title {{
            font-size: 1rem;
            font-weight: 600;
            margin-bottom: 1rem;
            color: var(--dim);
            text-align: center;
        }}
        #gauge {{ display: flex; justify-content: center; }}

        /* Celebration overlay */
        #fireworks-container {{
            position: fixed;
            top: 0; left: 0;
            width: 100%; height: 100%;
            z-index: 10;
            {overlay_background}
        }}
        #fireworks-video {{
            position: absolute;
            top: 0; left: 0;
            width: 100%; height: 100%;
            object-fit: cover;
            z-index: -1;
        }}
        @keyframes blinking-text {{
            0% {{ opacity: 1; }}
            50% {{ opacity: 0; }}
            100% {{ opacity: 1; }}
        }}
        #congratulations-text {{
            color: white;
            font-size: 2em;
            font-weight: 700;
            text-align: center;
            margin-top: 20%;
            padding: 0 2rem;
            animation: blinking-text 1s infinite;
        }}

        .footer {{
            text-align: center;
            color: var(--dim);
            font-size: 0.8rem;
            margin-top: 2rem;
        }}
    </style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        <div class="top-bar">
            {logos}
        </div>

        <div class="stats">
            <div class="stat completed">
                <div class="stat-value">{completed}</div>
                <div class="stat-label">Completed</div>
            </div>
            <div class="stat">
                <div class="stat-value">{target}</div>
                <div class="stat-label">Target</div>
            </div>
            <div class="stat">
                <div class="stat-value">{progress:.1}%</div>
                <div class="stat-label">Progress</div>
            </div>
            <div class="stat">
                <div class="stat-value">{remaining}</div>
                <div class="stat-label">Remaining</div>
            </div>
        </div>

        <div class="chart-card">
            <div class="chart-title">{gauge_title}</div>
            <div id="gauge"></div>
        </div>

        <div class="footer">
            {rows} rows read from column <code>{column}</code> &middot; generated {generated}
        </div>
    </div>

    <div id="{overlay_id}" style="display: {overlay_display}">
        {video}
        <div id="{text_id}" style="display: {text_display}">{message}</div>
    </div>

    <script>
    const data = {json_data};
    const regionIds = {region_ids};

    // Half-donut gauge over [0, target]
    function drawGauge() {{
        if (typeof d3 === 'undefined') return;
        const width = 440, height = 260;
        const radius = 190;

        const svg = d3.select('#gauge')
            .append('svg')
            .attr('width', width)
            .attr('height', height)
            .append('g')
            .attr('transform', `translate(${{width/2}},${{radius + 20}})`);

        const arc = d3.arc()
            .innerRadius(radius * 0.65)
            .outerRadius(radius)
            .startAngle(-Math.PI / 2);

        svg.append('path')
            .datum({{ endAngle: Math.PI / 2 }})
            .attr('d', arc)
            .attr('fill', '#30363d');

        svg.append('path')
            .datum({{ endAngle: -Math.PI / 2 + Math.PI * data.gauge.fraction }})
            .attr('d', arc)
            .attr('fill', data.gauge.bar_color);

        svg.append('text')
            .attr('text-anchor', 'middle')
            .attr('dy', '-0.3em')
            .style('font-size', '3rem')
            .style('font-weight', '700')
            .style('fill', '#e6edf3')
            .text(data.gauge.formatted);

        const labels = [[0, -radius * 0.82], [data.gauge.max, radius * 0.82]];
        labels.forEach(([value, x]) => {{
            svg.append('text')
                .attr('x', x)
                .attr('y', 24)
                .attr('text-anchor', 'middle')
                .style('fill', '#7d8590')
                .text(value.toLocaleString('en-US'));
        }});
    }}

    function applyState(state) {{
        Object.entries(state.regions).forEach(([region, visible]) => {{
            const el = document.getElementById(regionIds[region]);
            if (el) el.style.display = visible ? 'block' : 'none';
        }});
    }}

    // Re-evaluate once against the server when the page is served
    function refreshState() {{
        if (!location.protocol.startsWith('http')) return;
        fetch('api/state')
            .then(r => r.json())
            .then(res => {{ if (res.ok) applyState(res.data); }})
            .catch(() => {{}});
    }}

    // Initialize
    drawGauge();
    applyState(data.state);
    refreshState();
    </script>
</body>
</html>
"#,
        title = escape(&dashboard.title),
        bar_color = dashboard.gauge.bar_color,
        overlay_background = overlay_background,
        logos = logos.join("\n            "),
        completed = dashboard.gauge.formatted,
        target = crate::report::format_thousands(dashboard.gauge.max),
        progress = dashboard.progress,
        remaining = crate::report::format_thousands(dashboard.remaining),
        gauge_title = escape(&dashboard.gauge.title),
        rows = dashboard.survey.rows,
        column = escape(&dashboard.survey.column),
        generated = escape(&dashboard.generated),
        overlay_id = Region::Overlay.element_id(),
        overlay_display = state.display_style(Region::Overlay),
        video = video,
        text_id = Region::Text.element_id(),
        text_display = state.display_style(Region::Text),
        message = escape(&dashboard.celebration_message),
        json_data = json_data,
        region_ids = region_ids,
    )?;

    Ok(())
}

fn build_region_ids() -> String {
    let ids: Vec<String> = Region::ALL
        .iter()
        .map(|r| format!(r#""{}": "{}""#, r, r.element_id()))
        .collect();
    format!("{{{}}}", ids.join(", "))
}

/// Keep embedded JSON from closing the script element
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// Raw text inside `<style>` is not entity-decoded, so drop anything that
/// could end the `url('...')` token instead
fn css_url(url: &str) -> String {
    url.chars()
        .filter(|c| !matches!(c, '\'' | '"' | '\\' | '<' | '>' | '(' | ')' | '\n' | '\r'))
        .collect()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
