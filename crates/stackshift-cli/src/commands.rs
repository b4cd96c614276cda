//! Command handlers: run a core operation and render its result.

use anyhow::{bail, Result};
use log::{debug, info};
use stackshift_core::{
    display::{CreateResult, DeleteResult, OperationStatus, UpdateResult},
    models::WorkflowConfig,
    BatchSessionRegistry, PathValidator, StateStore, StateStoreBuilder,
};

use crate::cli::{parse_answers, BatchCommands, StateCommands, ValidateArgs};
use crate::renderer::TerminalRenderer;

/// Everything a command needs, resolved once in `main`.
pub struct App {
    validator: PathValidator,
    registry: BatchSessionRegistry,
    directory: String,
    renderer: TerminalRenderer,
}

impl App {
    pub fn new(
        validator: PathValidator,
        directory: Option<String>,
        renderer: TerminalRenderer,
    ) -> Self {
        Self {
            registry: BatchSessionRegistry::new(validator.clone()),
            validator,
            directory: directory.unwrap_or_else(|| ".".to_string()),
            renderer,
        }
    }

    fn store(&self) -> Result<StateStore> {
        let store = StateStoreBuilder::new(self.validator.working_directory())
            .with_validator(self.validator.clone())
            .with_directory(Some(self.directory.as_str()))
            .build()?;
        Ok(store)
    }

    pub async fn handle_state_command(&self, command: StateCommands) -> Result<()> {
        match command {
            StateCommands::Show => self.show_state().await,
            StateCommands::Init(args) => {
                let store = self.store()?;
                let mut state = store.initialize(args.route).await?;
                if let Some(session) = self.registry.find(&self.directory).await? {
                    info!("seeding workflow config from batch session {}", session.session_id);
                    state = store.adopt_session_answers(&session).await?;
                }
                self.renderer.render(&CreateResult::new(state));
                Ok(())
            }
            StateCommands::Start(args) => {
                let state = self.store()?.start_step(args.step).await?;
                let change = format!("Started {}", args.step.title());
                self.renderer
                    .render(&UpdateResult::with_changes(state, vec![change]));
                Ok(())
            }
            StateCommands::Complete(args) => {
                let details = args.details()?;
                let state = self.store()?.complete_step(args.step, details).await?;
                let change = format!("Completed {}", args.step.title());
                self.renderer
                    .render(&UpdateResult::with_changes(state, vec![change]));
                Ok(())
            }
            StateCommands::Next => {
                let status = match self.store()?.next_step().await? {
                    Some(step) => OperationStatus::success(format!(
                        "Next step: {}. {} ({step})",
                        step.position(),
                        step.title()
                    )),
                    None => OperationStatus::success("All steps are completed"),
                };
                self.renderer.render(&status);
                Ok(())
            }
            StateCommands::Route(args) => {
                let state = self.store()?.set_route(args.route).await?;
                let change = format!("Route set to {}", args.route);
                self.renderer
                    .render(&UpdateResult::with_changes(state, vec![change]));
                Ok(())
            }
            StateCommands::Config(args) => {
                let patch = WorkflowConfig::from(args);
                let store = self.store()?;
                if patch.is_empty() {
                    let state = store.load().await?;
                    if state.config.is_empty() {
                        self.renderer
                            .render(&OperationStatus::success("No workflow options set"));
                    } else {
                        self.renderer.render(&state.config);
                    }
                    return Ok(());
                }
                let state = store.update_config(patch).await?;
                self.renderer.render(&UpdateResult::new(state));
                Ok(())
            }
            StateCommands::Reset => {
                let removed = self.store()?.reset().await?;
                self.renderer
                    .render(&DeleteResult::new("workflow state", removed));
                Ok(())
            }
        }
    }

    pub async fn handle_batch_command(&self, command: BatchCommands) -> Result<()> {
        match command {
            BatchCommands::Create(args) => {
                let answers = parse_answers(args.answers.as_deref())?;
                let root = args.root.unwrap_or_else(|| self.directory.clone());
                let session = self
                    .registry
                    .create(&root, args.total, args.batch_size, answers)
                    .await?;
                self.renderer.render(&CreateResult::new(session));
                Ok(())
            }
            BatchCommands::Show => {
                match self.registry.find(&self.directory).await? {
                    Some(session) => self.renderer.render(&session),
                    None => self
                        .renderer
                        .render(&OperationStatus::success("No batch session found")),
                }
                Ok(())
            }
            BatchCommands::Mark(args) => {
                let Some(session) = self
                    .registry
                    .mark_processed(&args.id, &self.directory)
                    .await?
                else {
                    bail!("No batch session found");
                };
                let change = format!("Processed {}", args.id);
                self.renderer
                    .render(&UpdateResult::with_changes(session, vec![change]));
                Ok(())
            }
            BatchCommands::Answer(args) => {
                let answers = parse_answers(Some(&args.answers))?;
                let session = self
                    .registry
                    .record_answers(&self.directory, answers)
                    .await?;
                self.renderer.render(&UpdateResult::new(session));
                Ok(())
            }
            BatchCommands::Clear(args) => {
                let root = args.root.unwrap_or_else(|| self.directory.clone());
                let removed = self.registry.clear(&root).await?;
                self.renderer
                    .render(&DeleteResult::new("batch session", removed));
                Ok(())
            }
        }
    }

    pub async fn show_state(&self) -> Result<()> {
        let state = self.store()?.load().await?;
        self.renderer.render(&state);
        Ok(())
    }

    pub fn validate(&self, args: &ValidateArgs) -> Result<()> {
        let resolved = self.validator.validate_directory(&args.path)?;
        debug!("{} resolved to {}", args.path, resolved.display());
        self.renderer.render(&OperationStatus::success(format!(
            "{} is inside the workspace",
            args.path
        )));
        Ok(())
    }
}
