use crate::log::Variant;
use crate::overview::{Overview, RunReport};

/// Render the per-size chart report: latency vs node with error bars,
/// reliability vs node as bars (data embedded as JSON).
///
/// Important: we avoid `format!()` because the HTML contains many `{}`
/// from JS template literals (e.g., `${x}`), which would conflict with
/// Rust formatting.
pub fn render_run_chart(variant: Variant, report: &RunReport) -> anyhow::Result<String> {
    let data = serde_json::json!({
        "kind": "run",
        "variant": variant.name(),
        "size": report.size,
        "central": report.central,
        "nodes": &report.nodes,
        "latency_avg": &report.latency_avg,
        "latency_std": &report.latency_std,
        "reliability": &report.reliability,
        "summary": report.summary,
    });
    Ok(TEMPLATE.replace("__DATA__", &serde_json::to_string(&data)?))
}

/// Render the cross-size overview: aggregate latency and reliability vs
/// experiment size, each with error bars.
pub fn render_overview_chart(overview: &Overview) -> anyhow::Result<String> {
    let data = serde_json::json!({
        "kind": "overview",
        "variant": &overview.variant,
        "sizes": &overview.sizes,
        "avg_latency": &overview.avg_latency,
        "std_latency": &overview.std_latency,
        "avg_reliability": &overview.avg_reliability,
        "std_reliability": &overview.std_reliability,
    });
    Ok(TEMPLATE.replace("__DATA__", &serde_json::to_string(&data)?))
}

const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>NullNet experiment statistics</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .charts { padding: 16px; }
  .chart { margin-bottom: 24px; }
  .chart h3 { margin: 0 0 4px 0; font-size: 15px; }
  svg { background: #fff; border: 1px solid #eee; }
  .grid { stroke: #eee; }
  .axis { stroke: #333; }
  .tick-label { font-size: 11px; fill: #555; }
  .axis-label { font-size: 12px; fill: #333; }
  .marker { fill: #1f77b4; }
  .errbar { stroke: #1f77b4; stroke-width: 1.5; }
  .bar { fill: #1f77b4; }
</style>
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>

<div class="charts" id="charts"></div>

<script>
// Embedded report data (JSON object literal)
const DATA = __DATA__;

const W = 680, H = 320, PAD = { left: 56, right: 16, top: 12, bottom: 44 };

function el(tag, attrs) {
  const e = document.createElementNS("http://www.w3.org/2000/svg", tag);
  for (const [k, v] of Object.entries(attrs)) e.setAttribute(k, v);
  return e;
}

function niceTicks(lo, hi, n) {
  if (lo === hi) { lo -= 1; hi += 1; }
  const step = (hi - lo) / n;
  const mag = Math.pow(10, Math.floor(Math.log10(step)));
  const norm = step / mag;
  const nice = norm < 1.5 ? 1 : norm < 3.5 ? 2 : norm < 7.5 ? 5 : 10;
  const s = nice * mag;
  const ticks = [];
  for (let t = Math.ceil(lo / s) * s; t <= hi + 1e-9; t += s) ticks.push(t);
  return ticks;
}

function fmt(x) {
  return Math.abs(x) >= 1000 ? x.toFixed(0) : +x.toPrecision(4) + "";
}

// Shared frame: axes, grid, tick labels. Returns x/y pixel mappers.
function frame(svg, xs, yLo, yHi, xlabel, ylabel) {
  const xLo = Math.min(...xs), xHi = Math.max(...xs);
  const spanX = xHi - xLo || 1;
  const px = x => PAD.left + (x - xLo) / spanX * (W - PAD.left - PAD.right) * 0.92
      + (W - PAD.left - PAD.right) * 0.04;
  const py = y => H - PAD.bottom - (y - yLo) / (yHi - yLo || 1) * (H - PAD.top - PAD.bottom);

  for (const t of niceTicks(yLo, yHi, 5)) {
    svg.appendChild(el("line", { class: "grid", x1: PAD.left, y1: py(t), x2: W - PAD.right, y2: py(t) }));
    const lbl = el("text", { class: "tick-label", x: PAD.left - 6, y: py(t) + 4, "text-anchor": "end" });
    lbl.textContent = fmt(t);
    svg.appendChild(lbl);
  }

  // Label every node when few, else thin out.
  const every = Math.max(1, Math.ceil(xs.length / 16));
  xs.forEach((x, i) => {
    if (i % every !== 0 && i !== xs.length - 1) return;
    const lbl = el("text", { class: "tick-label", x: px(x), y: H - PAD.bottom + 16, "text-anchor": "middle" });
    lbl.textContent = x;
    svg.appendChild(lbl);
  });

  svg.appendChild(el("line", { class: "axis", x1: PAD.left, y1: H - PAD.bottom, x2: W - PAD.right, y2: H - PAD.bottom }));
  svg.appendChild(el("line", { class: "axis", x1: PAD.left, y1: PAD.top, x2: PAD.left, y2: H - PAD.bottom }));

  const xl = el("text", { class: "axis-label", x: (PAD.left + W - PAD.right) / 2, y: H - 8, "text-anchor": "middle" });
  xl.textContent = xlabel;
  svg.appendChild(xl);
  const yl = el("text", { class: "axis-label", x: 14, y: (PAD.top + H - PAD.bottom) / 2,
      transform: `rotate(-90 14 ${(PAD.top + H - PAD.bottom) / 2})`, "text-anchor": "middle" });
  yl.textContent = ylabel;
  svg.appendChild(yl);

  return { px, py };
}

function errorBarChart(title, xs, ys, errs, xlabel, ylabel) {
  const svg = el("svg", { width: W, height: H });
  let lo = Math.min(0, ...ys.map((y, i) => y - errs[i]));
  let hi = Math.max(...ys.map((y, i) => y + errs[i]), 1e-9);
  const { px, py } = frame(svg, xs, lo, hi, xlabel, ylabel);

  xs.forEach((x, i) => {
    const cx = px(x);
    svg.appendChild(el("line", { class: "errbar", x1: cx, y1: py(ys[i] - errs[i]), x2: cx, y2: py(ys[i] + errs[i]) }));
    svg.appendChild(el("line", { class: "errbar", x1: cx - 4, y1: py(ys[i] - errs[i]), x2: cx + 4, y2: py(ys[i] - errs[i]) }));
    svg.appendChild(el("line", { class: "errbar", x1: cx - 4, y1: py(ys[i] + errs[i]), x2: cx + 4, y2: py(ys[i] + errs[i]) }));
    svg.appendChild(el("circle", { class: "marker", cx: cx, cy: py(ys[i]), r: 3.5 }));
  });

  return section(title, svg);
}

function barChart(title, xs, ys, xlabel, ylabel) {
  const svg = el("svg", { width: W, height: H });
  const hi = Math.max(...ys, 1e-9);
  const { px, py } = frame(svg, xs, 0, hi, xlabel, ylabel);
  const bw = Math.max(2, Math.min(24, (W - PAD.left - PAD.right) / xs.length * 0.6));

  xs.forEach((x, i) => {
    svg.appendChild(el("rect", { class: "bar", x: px(x) - bw / 2, y: py(ys[i]),
        width: bw, height: (H - PAD.bottom) - py(ys[i]) }));
  });

  return section(title, svg);
}

function section(title, svg) {
  const div = document.createElement("div");
  div.className = "chart";
  const h = document.createElement("h3");
  h.textContent = title;
  div.appendChild(h);
  div.appendChild(svg);
  return div;
}

function pill(html) {
  const s = document.createElement("span");
  s.className = "pill";
  s.innerHTML = html;
  return s;
}

const summary = document.getElementById("summary");
const charts = document.getElementById("charts");

if (DATA.kind === "run") {
  summary.appendChild(pill(`variant: <b>${DATA.variant}</b>`));
  summary.appendChild(pill(`nodes: <b>${DATA.size}</b>`));
  summary.appendChild(pill(`central node: <b>${DATA.central}</b>`));
  summary.appendChild(pill(`avg latency: <b>${fmt(DATA.summary.avg_latency)} s</b>`));
  summary.appendChild(pill(`avg reliability: <b>${fmt(DATA.summary.avg_reliability)} %</b>`));

  charts.appendChild(errorBarChart("Latency per node", DATA.nodes, DATA.latency_avg,
      DATA.latency_std, "node instance", "latency in s"));
  charts.appendChild(barChart("Reliability per node", DATA.nodes, DATA.reliability,
      "node instance", "reliability in %"));
} else {
  summary.appendChild(pill(`variant: <b>${DATA.variant}</b>`));
  summary.appendChild(pill(`experiment sizes: <b>${DATA.sizes.join(", ")}</b>`));

  charts.appendChild(errorBarChart("Latency vs experiment size", DATA.sizes, DATA.avg_latency,
      DATA.std_latency, "number of nodes", "latency in s"));
  charts.appendChild(errorBarChart("Reliability vs experiment size", DATA.sizes, DATA.avg_reliability,
      DATA.std_reliability, "number of nodes", "reliability in %"));
}
</script>
</body>
</html>
"#;
