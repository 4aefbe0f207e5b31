//! `ask` — run one question through the pipeline and print the report.

use std::sync::Arc;

use deepbrief_config::AppConfig;
use deepbrief_core::event::{EventBus, ProgressEvent};
use deepbrief_pipeline::ReportGraph;

pub async fn run(question: &str, debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    let debug = debug || config.debug;

    let provider = Arc::new(deepbrief_providers::from_config(&config)?);
    let search = Arc::new(deepbrief_search::from_config(&config)?);
    let events = Arc::new(EventBus::default());

    // Render progress from the bus while the graph runs. The renderer task
    // ends on its own once the bus sender is dropped with the graph.
    let mut rx = events.subscribe();
    let renderer = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            render_event(&event, debug);
        }
    });

    let graph = ReportGraph::new(provider, search, events, &config);
    let state = graph.run(question, debug).await?;

    renderer.abort();

    match state.final_response {
        Some(report) => {
            println!("\n{report}");
        }
        None => {
            // Upstream contract violation: the graph always sets a final
            // response, even in the all-fallbacks case.
            eprintln!("warning: no final response found in report state");
        }
    }

    Ok(())
}

fn render_event(event: &ProgressEvent, debug: bool) {
    match event {
        ProgressEvent::PlanReady { queries } => {
            eprintln!("• Planned {} research queries", queries.len());
            if debug {
                for (i, q) in queries.iter().enumerate() {
                    eprintln!("    [{}] {q}", i + 1);
                }
            }
        }
        ProgressEvent::ResearchStarted { index, query } => {
            if debug {
                eprintln!("• Researching [{}] {query}", index + 1);
            }
        }
        ProgressEvent::FindingReady { index, title, .. } => {
            eprintln!(
                "• Finding [{}] ready: {}",
                index + 1,
                title.as_deref().unwrap_or("(untitled)")
            );
        }
        ProgressEvent::Collected { count } => {
            eprintln!("• Collected {count} findings");
        }
        ProgressEvent::SynthesisStarted { findings } => {
            eprintln!("• Synthesizing report from {findings} findings");
        }
        ProgressEvent::ReportReady { .. } => {
            eprintln!("• Report ready");
        }
        ProgressEvent::FallbackUsed { stage, reason } => {
            if debug {
                eprintln!("• Fallback in {stage} stage: {reason}");
            }
        }
    }
}
