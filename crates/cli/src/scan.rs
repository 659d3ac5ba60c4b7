use annoscan_core::orchestrator::Orchestrator;
use tracing::info;

pub fn routes(orchestrator: &Orchestrator) -> Result<(), Box<dyn std::error::Error>> {
    let path = orchestrator.scan_routes()?;
    info!("Route definitions written to {}", path.display());
    println!("Routes scanned!");
    Ok(())
}

pub fn events(orchestrator: &Orchestrator) -> Result<(), Box<dyn std::error::Error>> {
    let path = orchestrator.scan_events()?;
    info!("Event definitions written to {}", path.display());
    println!("Events scanned!");
    Ok(())
}
