use kubeprom_client::types::{Metric, TargetsData};
use kubeprom_client::QueryData;

fn format_labels(metric: &Metric) -> String {
    if metric.is_empty() {
        return "{}".to_string();
    }
    let labels: Vec<String> = metric
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, v))
        .collect();
    format!("{{{}}}", labels.join(", "))
}

/// Human readable rendering of a query result
pub fn render_query(query: &str, data: &QueryData) -> String {
    let mut output = format!("Query: {}\nResults:\n", query);
    if data.is_empty() {
        output.push_str("  (no data)\n");
        return output;
    }
    match data {
        QueryData::Vector(samples) => {
            for s in samples {
                output.push_str(&format!("  {} => {}\n", format_labels(&s.metric), s.value.1));
            }
        }
        QueryData::Matrix(series) => {
            for s in series {
                output.push_str(&format!("  {}\n", format_labels(&s.metric)));
                for (ts, v) in &s.values {
                    output.push_str(&format!("    @{} => {}\n", ts, v));
                }
            }
        }
        QueryData::Scalar((ts, v)) => output.push_str(&format!("  scalar @{} => {}\n", ts, v)),
        QueryData::String((ts, v)) => output.push_str(&format!("  string @{} => {}\n", ts, v)),
    }
    output
}

pub fn render_targets(targets: &TargetsData) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Active targets ({}):\n",
        targets.active_targets.len()
    ));
    for t in &targets.active_targets {
        let job = t.labels.get("job").map(String::as_str).unwrap_or("-");
        output.push_str(&format!("  [{}] {} {}", t.health, job, t.scrape_url));
        if !t.last_error.is_empty() {
            output.push_str(&format!(" (last error: {})", t.last_error));
        }
        output.push('\n');
    }
    output.push_str(&format!(
        "Dropped targets: {}\n",
        targets.dropped_targets.len()
    ));
    output
}
