// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use cognitive_ecology::backends::RecordingTransmitter;
use cognitive_ecology::blueprint::{
    export_blueprint, validate_reproducibility, BlueprintGenerator, EnterpriseConfig,
    ExportFormat, WorkbenchType,
};
use cognitive_ecology::build::{BuildExecutor, BuildStatus, ReproducibleBuilder};
use cognitive_ecology::config::{load_config, load_system_specification, AppConfig};
use cognitive_ecology::ecology::{
    CognitiveCity, CognitiveForge, ContextualMemoryPattern, OperationalizedRagFabric,
    ParticleSwarm, SwarmConfig,
};
use cognitive_ecology::enterprise::CognitiveEnterprise;
use cognitive_ecology::lsp::LanguageServer;
use cognitive_ecology::mcp::McpServer;
use cognitive_ecology::ml_department::{
    ArchitectureRequirements, CodebaseContext, DeploymentConstraints, EnterpriseRequirements,
    MlDepartment,
};
use cognitive_ecology::observability::init_tracing;
use cognitive_ecology::protocol_design::{
    DesignRequest, EcosystemPhase, EnvironmentFeedback, IntrospectiveProtocolDesigner,
    MetaProtocol,
};
use cognitive_ecology::transport::{
    ChannelType, ContentType, NeuralTransport, OptimizeOutcome, MAX_PRIORITY,
};

const DEFAULT_SPECIFICATION: &str = "configs/ai_system.yaml";

#[derive(Debug, Parser)]
#[command(name = "cognitive-ecology", version, about = "Cognitive ecology toolkit for AI enterprises")]
struct Cli {
    /// Application config (YAML or TOML); built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve cognitive architecture clients over WebSocket until Ctrl-C
    Mcp,
    /// Run the language server on stdin/stdout
    Lsp,
    /// Build every scenario of a system specification
    Build {
        #[arg(default_value = DEFAULT_SPECIFICATION)]
        spec: PathBuf,
        /// Only build this deployment scenario
        #[arg(short, long)]
        scenario: Option<String>,
        /// Write the system blueprint as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a workbench blueprint and print it
    Blueprint {
        /// ml_research, nn_development, protocol_design or hybrid_workbench
        #[arg(default_value = "hybrid_workbench")]
        workbench: String,
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },
    /// Lay out the demo enterprise and print its manifest
    Enterprise,
    /// Exercise neural transport channels between organizations
    Transport,
    /// Encode a memory pattern across two cognitive cities
    Ecology,
    /// Grow the primary cognitive city through its forge phases
    Forge,
    /// Design, evolve and federate protocols
    Protocols,
    /// Analyze a codebase and recommend an architecture
    Ml,
    /// Walk through every subsystem
    Demo {
        /// Pause between sections
        #[arg(short, long)]
        interactive: bool,
        /// Write the per-section results as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// One stop of the guided tour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Enterprise,
    Transport,
    Ecology,
    Forge,
    Protocols,
    Ml,
    Blueprint,
    Build,
}

impl Section {
    const ALL: [Section; 8] = [
        Section::Enterprise,
        Section::Transport,
        Section::Ecology,
        Section::Forge,
        Section::Protocols,
        Section::Ml,
        Section::Blueprint,
        Section::Build,
    ];

    fn title(&self) -> &'static str {
        match self {
            Section::Enterprise => "Cognitive Enterprise",
            Section::Transport => "Neural Transport",
            Section::Ecology => "Operationalized RAG Fabric",
            Section::Forge => "Cognitive Forge",
            Section::Protocols => "Introspective Protocol Design",
            Section::Ml => "Enterprise ML Department",
            Section::Blueprint => "Workbench Blueprint",
            Section::Build => "Reproducible Build",
        }
    }
}

#[derive(Debug, Serialize)]
struct SectionResult {
    title: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct DemoSummary {
    timestamp: DateTime<Utc>,
    sections_completed: usize,
    sections_failed: usize,
    sections: Vec<SectionResult>,
}

/// Wait for user to press Enter with a custom prompt
fn wait_for_keypress(prompt: &str) -> Result<()> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(())
}

fn banner(title: &str) {
    println!("\n{}", "═".repeat(80));
    println!("{}", title);
    println!("{}", "═".repeat(80));
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    init_tracing(&config.logging);

    match cli.command {
        Command::Mcp => {
            McpServer::new(config.mcp)
                .run()
                .await
                .context("MCP server failed")?;
        }
        Command::Lsp => {
            let code = LanguageServer::new(config.lsp)
                .serve(tokio::io::stdin(), tokio::io::stdout())
                .await
                .context("language server failed")?;
            std::process::exit(code);
        }
        Command::Build {
            spec,
            scenario,
            output,
        } => {
            run_build(&config, &spec, scenario.as_deref(), output.as_deref()).await?;
        }
        Command::Blueprint { workbench, format } => {
            let workbench: WorkbenchType = workbench.parse()?;
            let format: ExportFormat = format.parse()?;
            run_blueprint(workbench, format)?;
        }
        Command::Enterprise => {
            run_enterprise()?;
        }
        Command::Transport => {
            run_transport().await?;
        }
        Command::Ecology => {
            run_ecology(&config);
        }
        Command::Forge => {
            run_forge(&config)?;
        }
        Command::Protocols => {
            run_protocols()?;
        }
        Command::Ml => {
            run_ml()?;
        }
        Command::Demo {
            interactive,
            output,
        } => {
            let summary = run_demo(&config, interactive, output.as_deref()).await?;
            if summary.sections_failed > 0 {
                anyhow::bail!("{} demo section(s) failed", summary.sections_failed);
            }
        }
    }

    Ok(())
}

async fn run_build(
    config: &AppConfig,
    spec_path: &Path,
    scenario: Option<&str>,
    output: Option<&Path>,
) -> Result<Value> {
    println!("🏗️  Reproducible AI Build");
    println!("═══════════════════════════");

    let specification = load_system_specification(spec_path)
        .with_context(|| format!("failed to load system specification {}", spec_path.display()))?;
    let system_name = spec_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("ai_system");

    let mut builder = ReproducibleBuilder::new(&config.builder.store_path);
    let blueprint = builder
        .create_ai_system_blueprint(system_name, &specification)
        .context("failed to assemble system blueprint")?;

    println!("System: {} v{}", blueprint.system_name, blueprint.system_version);
    println!("Components: {}", blueprint.components.len());
    for key in blueprint.components.keys() {
        println!("  • {}", key);
    }

    if let Some(path) = output {
        let rendered = serde_json::to_string_pretty(&blueprint)?;
        std::fs::write(path, rendered)
            .with_context(|| format!("failed to write blueprint to {}", path.display()))?;
        println!("📝 Blueprint written to {}", path.display());
    }

    let selected: Vec<_> = match scenario {
        Some(name) => {
            let manifest = blueprint
                .build_manifests
                .get(name)
                .with_context(|| format!("no deployment scenario named {}", name))?;
            vec![(name.to_string(), manifest)]
        }
        None => blueprint
            .build_manifests
            .iter()
            .map(|(name, manifest)| (name.clone(), manifest))
            .collect(),
    };

    let executor = BuildExecutor::from_config(&config.builder);
    let mut failures = 0;
    let mut statuses = Map::new();
    for (name, manifest) in selected {
        println!("\n{}", "─".repeat(80));
        println!("🎯 Scenario: {} ({})", name, manifest.target_name);
        println!("   Manifest: {}", manifest.manifest_id);

        let start = Instant::now();
        let report = executor
            .execute(manifest)
            .await
            .with_context(|| format!("scenario {} could not be built", name))?;
        let elapsed = start.elapsed();

        let icon = if report.status == BuildStatus::Success { "✅" } else { "❌" };
        println!("{} Status: {}", icon, report.status.as_str());
        println!("   Environment: {}", report.environment_id);
        println!("   Artifacts: {}", report.artifacts.len());
        for (component, outcome) in &report.component_results {
            println!("   • {}: {:?}", component, outcome);
        }
        if let Some(verification) = &report.verification {
            for failed in &verification.failed_verifications {
                println!("   ⚠️  Verification failed: {}", failed);
            }
        }
        println!("⏱️  Execution time: {:.2?}", elapsed);

        if report.status != BuildStatus::Success {
            failures += 1;
        }
        statuses.insert(name, json!(report.status.as_str()));
    }

    if failures > 0 {
        anyhow::bail!("{} scenario(s) did not build cleanly", failures);
    }
    Ok(json!({
        "system_name": blueprint.system_name,
        "components": blueprint.components.len(),
        "scenarios": statuses,
    }))
}

fn run_blueprint(workbench: WorkbenchType, format: ExportFormat) -> Result<Value> {
    let mut generator = BlueprintGenerator::new();
    let blueprint = generator
        .create_ai_workbench_blueprint(workbench, &EnterpriseConfig::default())
        .with_context(|| format!("failed to generate {} blueprint", workbench))?;

    println!("{}", export_blueprint(&blueprint, format)?);

    let report = validate_reproducibility(&blueprint);
    eprintln!("🔒 Reproducibility checks for {}:", blueprint.name);
    for (check, passed) in report.checks() {
        eprintln!("   {} {}", if passed { "✅" } else { "❌" }, check);
    }
    Ok(json!({
        "blueprint": blueprint.name,
        "version": blueprint.version,
        "packages": blueprint.environment.packages.len(),
        "reproducible": report.is_reproducible(),
    }))
}

fn demo_enterprise() -> Result<CognitiveEnterprise> {
    let mut enterprise = CognitiveEnterprise::new("ai-enterprise");
    enterprise.create_cognitive_city_namespace(
        "GitHub-Copilot",
        &["code_generation", "ml_engineering", "protocol_design"],
    )?;
    enterprise
        .create_cognitive_city_namespace("Claude", &["analytical_reasoning", "code_intelligence"])?;
    enterprise.create_cognitive_city_namespace("Grok", &["creative_reasoning"])?;
    enterprise.create_workbench_namespace(
        "AI-Operating-System",
        &["GitHub-Copilot", "Claude", "Grok"],
    )?;
    enterprise.create_department_namespace(
        "ML",
        "GitHub-Copilot",
        &["enterprise_ml", "architecture_search"],
    )?;
    enterprise.create_transport_hub_namespace()?;
    Ok(enterprise)
}

fn run_enterprise() -> Result<Value> {
    println!("🏢 Cognitive Enterprise");
    println!("═══════════════════════");

    let enterprise = demo_enterprise().context("failed to lay out enterprise")?;
    let manifest = enterprise.generate_enterprise_manifest();

    println!("Enterprise: {}", manifest.enterprise_name);
    println!("Namespaces: {}", manifest.total_namespaces);
    println!("🏙️  Cognitive cities:");
    for city in &manifest.cognitive_cities {
        println!("   • {}", city);
    }
    println!("🛠️  Workbenches:");
    for workbench in &manifest.active_workbenches {
        println!("   • {}", workbench);
    }
    println!(
        "🧠 Neural topology: {} routes, {} endpoints, hubs {:?}",
        manifest.neural_topology.routing_table_size,
        manifest.neural_topology.total_endpoints,
        manifest.neural_topology.transport_hubs
    );
    println!("📊 Specialization matrix:");
    for (domain, orgs) in &manifest.specialization_matrix {
        println!("   {} -> {}", domain, orgs.join(", "));
    }
    Ok(json!({
        "enterprise_name": manifest.enterprise_name,
        "total_namespaces": manifest.total_namespaces,
        "cognitive_cities": manifest.cognitive_cities,
        "active_workbenches": manifest.active_workbenches,
        "neural_topology": manifest.neural_topology,
    }))
}

async fn run_transport() -> Result<Value> {
    println!("🔌 Neural Transport");
    println!("═══════════════════");

    let transmitter = Arc::new(RecordingTransmitter::new());
    let mut transport = NeuralTransport::new(transmitter.clone());

    let copilot = "ai-enterprise-github-copilot-cognitive-city";
    let claude = "ai-enterprise-claude-cognitive-city";
    transport.establish_channel(copilot, claude, ChannelType::Standard);

    let mut content = Map::new();
    content.insert("title".to_string(), json!("Streaming tokenizer regression"));
    content.insert("references".to_string(), json!(["#42", "#57"]));
    let packet = transport
        .transmit_context(copilot, claude, content, ContentType::Issue, MAX_PRIORITY)
        .await
        .context("failed to transmit context")?;
    println!(
        "📦 Sent {} packet {} (priority {}, {} dependencies)",
        packet.content_type.as_str(),
        packet.context_hash,
        packet.priority,
        packet.dependencies.len()
    );
    if let Some(status) = transport.channel_status(copilot, claude) {
        println!(
            "📡 {} up {:.1}s, health {:.2}",
            status.channel_id, status.uptime_seconds, status.health_score
        );
    }

    let optimized = loop {
        match transport.optimize_channel(copilot, claude)? {
            OptimizeOutcome::Upgraded { from, to } => {
                println!("⚡ Upgraded {} -> {}", from.as_str(), to.as_str());
            }
            OptimizeOutcome::AlreadyOptimal { channel_type } => {
                println!("✅ Channel already optimal ({})", channel_type.as_str());
                break channel_type;
            }
        }
    };

    for status in transport.list_active_channels() {
        println!(
            "   • {} [{}] health {:.3}, {} bps, {:.1} ms",
            status.channel_id,
            status.channel_type.as_str(),
            status.health_score,
            status.bandwidth,
            status.latency_ms
        );
    }

    let dropped = transport.close_channel(copilot, claude)?;
    let delivered = transmitter.delivered().await.len();
    println!(
        "🧹 Closed channel, dropped {} cached packet(s), {} delivered",
        dropped, delivered
    );
    Ok(json!({
        "context_hash": packet.context_hash,
        "priority": packet.priority,
        "optimized_to": optimized.as_str(),
        "packets_delivered": delivered,
        "packets_dropped_on_close": dropped,
    }))
}

fn city(name: &str, namespace: &str, specializations: &[&str], peer: &str) -> CognitiveCity {
    CognitiveCity {
        name: name.to_string(),
        namespace: namespace.to_string(),
        specializations: specializations.iter().map(|s| s.to_string()).collect(),
        neural_transport_channels: BTreeMap::from([(format!("to_{}", peer), peer.to_string())]),
        memory_patterns: BTreeMap::new(),
        activation_landscape: BTreeMap::new(),
        repository_count: 0,
        cognitive_maturity: 0.0,
    }
}

fn run_ecology(config: &AppConfig) -> Value {
    println!("🌿 Operationalized RAG Fabric");
    println!("═════════════════════════════");

    let copilot = "github.com/ai-enterprise-github-copilot-cognitive-city";
    let claude = "github.com/ai-enterprise-claude-cognitive-city";

    let mut fabric =
        OperationalizedRagFabric::new(ParticleSwarm::new(SwarmConfig::from(&config.swarm)));
    fabric.register_cognitive_city(city(
        "GitHub Copilot",
        copilot,
        &["code_generation", "ml_engineering"],
        claude,
    ));
    fabric.register_cognitive_city(city(
        "Claude",
        claude,
        &["code_generation", "analytical_reasoning"],
        copilot,
    ));
    println!("🔗 Transport links: {}", fabric.transport().len());

    let pattern = ContextualMemoryPattern {
        pattern_id: "pr_review_cycle".to_string(),
        priority_profile: BTreeMap::from([
            ("code_generation".to_string(), 0.9),
            ("ml_engineering".to_string(), 0.4),
        ]),
        execution_trace: Vec::new(),
        embedding_vector: None,
        salience_score: 0.8,
        organization_context: copilot.to_string(),
    };

    let start = Instant::now();
    let transfers = fabric.encode_memory_pattern(pattern);
    println!("🧬 Encoded pattern in {:.2?}", start.elapsed());
    for transfer in &transfers {
        println!(
            "   • {} -> {} [{}] {:.4}",
            transfer.source, transfer.target, transfer.specialty, transfer.activation
        );
    }
    for city in fabric.cities() {
        println!("🏙️  {} activation: {:?}", city.name, city.activation_landscape);
    }
    json!({
        "transport_links": fabric.transport().len(),
        "transfers": transfers.len(),
        "embedding_dimensions": fabric
            .memory_pattern("pr_review_cycle")
            .and_then(|p| p.embedding_vector.as_ref())
            .map_or(0, Vec::len),
    })
}

fn run_forge(config: &AppConfig) -> Result<Value> {
    println!("🔥 Cognitive Forge");
    println!("══════════════════");

    let mut forge = CognitiveForge::new(ParticleSwarm::new(SwarmConfig::from(&config.swarm)));
    let start = Instant::now();
    let report = forge.forge();
    println!("⏱️  Forged in {:.2?}", start.elapsed());

    println!("🏙️  {} ({})", report.city.name, report.city.namespace);
    println!("   Repositories: {}", report.city.repository_count);
    println!("   Cognitive maturity: {:.2}", report.city.cognitive_maturity);
    println!("📚 Knowledge base:");
    for repository in &report.knowledge_base {
        println!("   • {}", repository);
    }
    println!("🧬 Memory patterns:");
    for (pattern_id, dimensions) in &report.encoded_patterns {
        println!("   • {} ({} dimensions)", pattern_id, dimensions);
    }
    println!("🔄 Next evolution steps:");
    for step in &report.next_evolution_steps {
        println!("   • {}", step);
    }
    Ok(serde_json::to_value(&report)?)
}

fn run_protocols() -> Result<Value> {
    println!("🧪 Introspective Protocol Design");
    println!("════════════════════════════════");

    let mut designer = IntrospectiveProtocolDesigner::new();
    designer.initialize_meta_protocol_system();
    for meta in MetaProtocol::ALL {
        if let Some(organism) = designer.meta_protocol(meta) {
            println!(
                "   • {} ({} genes, fitness {:.3})",
                organism.organism_id,
                organism.gene_sequence.len(),
                organism.fitness()
            );
        }
    }

    let request = DesignRequest {
        name: "Context Sync Protocol".to_string(),
        purpose: "Synchronize context between cognitive cities".to_string(),
        requirements: vec![
            "context synchronization".to_string(),
            "collaboration across organizations".to_string(),
        ],
        collaboration_interfaces: vec!["neural_transport".to_string()],
        ..DesignRequest::default()
    };
    let designed = designer.design_protocol_using_introspection(&request)?;
    println!(
        "🧬 Designed {} with genes {:?}",
        designed.organism_id,
        designed
            .gene_sequence
            .iter()
            .map(|g| g.gene_id.as_str())
            .collect::<Vec<_>>()
    );

    let feedback = EnvironmentFeedback {
        performance_metrics: BTreeMap::from([("throughput".to_string(), 92.0)]),
        user_satisfaction: 4.5,
        ecosystem_phase: EcosystemPhase::InnovationPeace,
        competitive_pressure: 0.2,
        collaboration_success_rate: 0.9,
    };
    let evolved = designer.evolve_protocol_through_introspection(&designed.organism_id, &feedback)?;
    println!(
        "🌱 Evolved to {} (generation {}, fitness {:.3})",
        evolved.organism_id,
        evolved.generation,
        evolved.fitness()
    );

    let designer_id = MetaProtocol::Designer.organism().organism_id;
    let ecosystem = designer
        .create_collaborative_protocol_ecosystem(&[designer_id.as_str(), evolved.organism_id.as_str()])?;
    println!(
        "🤝 Ecosystem {} with {} participants, {} channels, quorum {}",
        ecosystem.ecosystem_id,
        ecosystem.participants.len(),
        ecosystem.topology.len(),
        ecosystem.consensus.quorum
    );
    Ok(json!({
        "designed": designed.organism_id,
        "evolved": evolved.organism_id,
        "generation": evolved.generation,
        "ecosystem_id": ecosystem.ecosystem_id,
        "participants": ecosystem.participants,
    }))
}

fn run_ml() -> Result<Value> {
    println!("🤖 Enterprise ML Department");
    println!("═══════════════════════════");

    let mut department = MlDepartment::new(Map::from_iter([(
        "enterprise".to_string(),
        Value::from("ai-enterprise"),
    )]));

    let context = CodebaseContext {
        codebase_features: vec!["python".to_string(), "typescript".to_string()],
        pattern_frequencies: BTreeMap::from([
            ("mvc_pattern".to_string(), 0.6),
            ("microservices".to_string(), 0.3),
        ]),
        enterprise_requirements: EnterpriseRequirements {
            max_latency_ms: Some(50),
            data_privacy: true,
        },
    };
    let analysis = department.analyze_enterprise_codebase(&context);
    println!(
        "🔍 {} patterns, {} opportunities, compliance {:.2}",
        analysis.identified_patterns.len(),
        analysis.optimization_opportunities.len(),
        analysis.enterprise_compliance.compliance_score
    );
    for insight in &analysis.natural_language_insights {
        println!("   • {}", insight);
    }

    let requirements = ArchitectureRequirements {
        domain: "code_understanding".to_string(),
        performance_targets: BTreeMap::from([("accuracy".to_string(), 0.9)]),
        constraints: DeploymentConstraints {
            on_premise_only: true,
            low_latency_required: true,
        },
    };
    let recommendation = department.recommend_enterprise_architecture(&requirements)?;
    println!(
        "🏛️  Recommended {} ({:?}, edge {})",
        recommendation.recommended_architecture.name,
        recommendation.deployment_strategy.deployment_type,
        recommendation.deployment_strategy.edge_deployment
    );
    for (target, projection) in &recommendation.performance_projections {
        println!("   • {}: {:.2}", target, projection);
    }

    let knowledge = department.export_department_knowledge();
    println!(
        "📚 Department knowledge:\n{}",
        serde_json::to_string_pretty(&knowledge)?
    );
    Ok(json!({
        "identified_patterns": analysis.identified_patterns.len(),
        "compliance_score": analysis.enterprise_compliance.compliance_score,
        "recommended_architecture": recommendation.recommended_architecture.name,
        "registered_models": department.model_registry().len(),
    }))
}

async fn run_section(config: &AppConfig, section: Section) -> Result<Value> {
    match section {
        Section::Enterprise => run_enterprise(),
        Section::Transport => run_transport().await,
        Section::Ecology => Ok(run_ecology(config)),
        Section::Forge => run_forge(config),
        Section::Protocols => run_protocols(),
        Section::Ml => run_ml(),
        Section::Blueprint => run_blueprint(WorkbenchType::HybridWorkbench, ExportFormat::Yaml),
        Section::Build => run_build(config, Path::new(DEFAULT_SPECIFICATION), None, None).await,
    }
}

async fn run_demo(
    config: &AppConfig,
    interactive: bool,
    output: Option<&Path>,
) -> Result<DemoSummary> {
    println!("🦀 Cognitive Ecology - Guided Tour");
    println!("═══════════════════════════════════");
    for (i, section) in Section::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, section.title());
    }

    let mut sections = Vec::new();
    for (i, section) in Section::ALL.into_iter().enumerate() {
        let title = section.title();
        banner(&format!("Section {}: {}", i + 1, title));
        if interactive {
            wait_for_keypress(&format!("Press Enter to run {}... ", title))?;
        }
        let result = match run_section(config, section).await {
            Ok(summary) => {
                println!("\n✅ {} completed", title);
                SectionResult {
                    title,
                    status: "completed",
                    summary: Some(summary),
                    error: None,
                }
            }
            Err(e) => {
                println!("\n❌ {} failed: {:#}", title, e);
                SectionResult {
                    title,
                    status: "failed",
                    summary: None,
                    error: Some(format!("{:#}", e)),
                }
            }
        };
        sections.push(result);
    }

    let sections_failed = sections.iter().filter(|s| s.status == "failed").count();
    let summary = DemoSummary {
        timestamp: Utc::now(),
        sections_completed: sections.len() - sections_failed,
        sections_failed,
        sections,
    };

    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)
            .with_context(|| format!("failed to write demo results to {}", path.display()))?;
        println!("📝 Results written to {}", path.display());
    }

    println!("\n🎉 Tour complete!");
    Ok(summary)
}
