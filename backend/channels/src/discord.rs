use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use embedtool_core::{ChannelRef, MessageRef, SessionMode, TutorialImages, TutorialOverlay, UserIdentity};
use embedtool_session::{
    ControlActivation, ControlId, OpenRequest, RegistrySettings, Reply, SessionContext, SessionError, SessionId,
    SessionRegistry, detect_control, is_embedtool_id,
};
use serenity::all::{
    ActivityData, Command, CommandInteraction, ComponentInteraction, ComponentInteractionDataKind, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseFollowup, CreateInteractionResponseMessage, GuildId, Http, Interaction, Member,
    ModalInteraction, User,
};
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info, warn};

use crate::ChannelAdapter;
use crate::discord_commands::{COMMAND_NAME, EmbedCommand, embed_command};
use crate::discord_components::{choice_row, component_activation, panel_rows};
use crate::discord_delivery::SerenityDelivery;
use crate::discord_embeds::DiscordEmbeds;
use crate::discord_modals::{form_modal, modal_values};
use crate::discord_panels::DiscordPanels;

/// Display identity of whoever triggered an interaction.
fn identity(user: &User, member: Option<&Member>) -> UserIdentity {
    let name = member
        .map(|m| m.display_name().to_string())
        .unwrap_or_else(|| user.display_name().to_string());
    let avatar = member.map(|m| m.face()).unwrap_or_else(|| user.face());
    UserIdentity::new(user.id.get(), name).with_avatar(avatar)
}

fn ephemeral(embed: CreateEmbed) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().embed(embed).ephemeral(true))
}

fn error_embed(err: &SessionError) -> CreateEmbed {
    let title = match err {
        SessionError::Embed(e) => e.heading(),
        SessionError::Delivery(_) => "Delivery Failed",
        _ => "Error",
    };
    let mut message = err.to_string();
    if let Some(first) = message.get(..1) {
        message = first.to_uppercase() + &message[1..];
    }
    DiscordEmbeds::error_card(title, &message)
}

fn error_response(err: &SessionError) -> CreateInteractionResponse {
    ephemeral(error_embed(err))
}

/// Controls whose handling waits on the Discord REST API. Their interaction is
/// deferred first and answered with a followup.
fn defers_response(control: ControlId) -> bool {
    control == ControlId::Send
}

/// Followup for a deferred activation.
fn followup_embed(result: &Result<Reply, SessionError>) -> CreateEmbed {
    match result {
        Ok(Reply::Terminated(outcome)) => DiscordEmbeds::delivered(outcome),
        Ok(Reply::Rejected(rejection)) => DiscordEmbeds::rejection(rejection),
        Ok(_) => DiscordEmbeds::notice("Embed Tool", "Nothing to send."),
        Err(e) => error_embed(e),
    }
}

/// The interaction a reply is answered on.
enum Source<'a> {
    Component(&'a ComponentInteraction),
    Modal(&'a ModalInteraction),
}

impl Source<'_> {
    async fn respond(&self, http: &Http, response: CreateInteractionResponse) -> serenity::Result<()> {
        match self {
            Source::Component(c) => c.create_response(http, response).await,
            Source::Modal(m) => m.create_response(http, response).await,
        }
    }

    async fn defer(&self, http: &Http) -> serenity::Result<()> {
        match self {
            Source::Component(c) => c.defer_ephemeral(http).await,
            Source::Modal(m) => m.defer_ephemeral(http).await,
        }
    }

    async fn followup(&self, http: &Http, embed: CreateEmbed) -> serenity::Result<()> {
        let followup = CreateInteractionResponseFollowup::new().embed(embed).ephemeral(true);
        match self {
            Source::Component(c) => c.create_followup(http, followup).await.map(|_| ()),
            Source::Modal(m) => m.create_followup(http, followup).await.map(|_| ()),
        }
    }

    /// Whether the interaction came from the panel itself rather than from a
    /// field picker message.
    fn on_panel(&self, control: ControlId) -> bool {
        match self {
            Source::Component(c) => matches!(c.data.kind, ComponentInteractionDataKind::Button),
            Source::Modal(_) => control != ControlId::EditField,
        }
    }
}

struct Handler {
    sessions: SessionRegistry,
    panels: Arc<DiscordPanels>,
    guild_id: Option<u64>,
}

impl Handler {
    async fn register_commands(&self, ctx: &Context) {
        let commands = vec![embed_command()];
        if let Some(guild_id) = self.guild_id {
            match GuildId::new(guild_id).set_commands(&ctx.http, commands).await {
                Ok(_) => info!("[Discord] Registered /{} in guild {}", COMMAND_NAME, guild_id),
                Err(e) => warn!("[Discord] Failed to register guild commands: {}", e),
            }
        } else {
            match Command::set_global_commands(&ctx.http, commands).await {
                Ok(_) => info!("[Discord] Registered global /{}", COMMAND_NAME),
                Err(e) => warn!("[Discord] Failed to register global commands: {}", e),
            }
        }
    }

    async fn handle_command(&self, ctx: &Context, command: &CommandInteraction) {
        let parsed = match EmbedCommand::from_options(&command.data.options) {
            Ok(parsed) => parsed,
            Err(e) => {
                let response = ephemeral(DiscordEmbeds::error_card("Error", &e.to_string()));
                if let Err(e) = command.create_response(&ctx.http, response).await {
                    warn!("[Discord] Failed to answer /{}: {}", COMMAND_NAME, e);
                }
                return;
            }
        };

        let guild_id = command.guild_id.map(|g| g.get());
        let here = command.channel_id.get();
        let mode = match parsed {
            EmbedCommand::Send { channel } => SessionMode::NewSend {
                channel: ChannelRef { guild_id, channel_id: channel.unwrap_or(here) },
            },
            EmbedCommand::Edit { message_id, channel } => SessionMode::EditExisting {
                message: MessageRef { guild_id, channel_id: channel.unwrap_or(here), message_id },
            },
        };
        let invoker = identity(&command.user, command.member.as_deref());

        let handle = match self.sessions.open(OpenRequest { mode, invoker }).await {
            Ok(handle) => handle,
            Err(e) => {
                info!("[Discord] Not opening a session for {}: {}", command.user.id, e);
                if let Err(e) = command.create_response(&ctx.http, error_response(&e)).await {
                    warn!("[Discord] Failed to answer /{}: {}", COMMAND_NAME, e);
                }
                return;
            }
        };

        self.panels.attach(handle.id, command.clone()).await;
        let embeds = handle.render.embeds().into_iter().map(DiscordEmbeds::from_draft).collect();
        let panel = CreateInteractionResponseMessage::new()
            .embeds(embeds)
            .components(panel_rows(handle.id, &handle.render.controls))
            .ephemeral(true);
        if let Err(e) = command.create_response(&ctx.http, CreateInteractionResponse::Message(panel)).await {
            error!("[Discord] Failed to show editor panel: {}", e);
            self.panels.detach(handle.id).await;
            self.sessions.expire(handle.id).await;
        }
    }

    async fn handle_component(&self, ctx: &Context, component: &ComponentInteraction) {
        let Some((session, activation)) = component_activation(&component.data.custom_id, &component.data.kind) else {
            if is_embedtool_id(&component.data.custom_id) {
                if let Err(e) = component.create_response(&ctx.http, CreateInteractionResponse::Acknowledge).await {
                    warn!("[Discord] Failed to acknowledge {}: {}", component.data.custom_id, e);
                }
            }
            return;
        };
        let activation = activation.by(identity(&component.user, component.member.as_ref()));
        self.activate(ctx, Source::Component(component), session, activation).await;
    }

    async fn handle_modal(&self, ctx: &Context, modal: &ModalInteraction) {
        let Some((session, control)) = detect_control(&modal.data.custom_id) else {
            return;
        };
        let activation = ControlActivation::form(control, modal_values(&modal.data.components))
            .by(identity(&modal.user, modal.member.as_ref()));
        self.activate(ctx, Source::Modal(modal), session, activation).await;
    }

    async fn activate(&self, ctx: &Context, source: Source<'_>, session: SessionId, activation: ControlActivation) {
        let control = activation.control;
        let http = &ctx.http;

        if defers_response(control) {
            if let Err(e) = source.defer(http).await {
                warn!("[Discord] Failed to defer {} on {}: {}", control, session, e);
            }
            let result = self.sessions.activate(session, activation).await;
            if let Err(e) = source.followup(http, followup_embed(&result)).await {
                warn!("[Discord] Failed to follow up {} on {}: {}", control, session, e);
            }
            self.finish(session, &result).await;
            return;
        }

        let result = self.sessions.activate(session, activation).await;

        let response = match &result {
            Ok(Reply::Render(render)) if source.on_panel(control) => {
                let embeds = render.embeds().into_iter().map(DiscordEmbeds::from_draft).collect();
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embeds(embeds)
                        .components(panel_rows(session, &render.controls)),
                )
            }
            Ok(Reply::Render(render)) => {
                if let Err(e) = self.panels.update(session, render).await {
                    warn!("[Discord] {:#}", e);
                }
                let done = if control == ControlId::RemoveField { "Field removed." } else { "Field edited." };
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(DiscordEmbeds::notice("Done", done))
                        .components(Vec::new()),
                )
            }
            Ok(Reply::Prompt(form)) => CreateInteractionResponse::Modal(form_modal(session, form)),
            Ok(Reply::Choose(choice)) => CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(DiscordEmbeds::notice(choice.title, choice.description))
                    .components(vec![choice_row(session, choice)])
                    .ephemeral(true),
            ),
            Ok(Reply::Rejected(rejection)) => ephemeral(DiscordEmbeds::rejection(rejection)),
            Ok(Reply::Terminated(outcome)) => ephemeral(DiscordEmbeds::delivered(outcome)),
            Ok(Reply::Discarded) => CreateInteractionResponse::Acknowledge,
            Err(e) => error_response(e),
        };

        if let Err(e) = source.respond(http, response).await {
            warn!("[Discord] Failed to answer {} on {}: {}", control, session, e);
        }
        self.finish(session, &result).await;
    }

    /// Tear down or freeze the panel once the session is over.
    async fn finish(&self, session: SessionId, result: &Result<Reply, SessionError>) {
        match result {
            Ok(Reply::Terminated(_)) | Ok(Reply::Discarded) => self.panels.remove(session).await,
            Err(SessionError::Delivery(_)) => self.panels.freeze(session).await,
            _ => {}
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
        ctx.set_activity(Some(ActivityData::listening(format!("/{COMMAND_NAME}"))));
        self.register_commands(&ctx).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) if command.data.name == COMMAND_NAME => {
                self.handle_command(&ctx, &command).await;
            }
            Interaction::Component(component) => self.handle_component(&ctx, &component).await,
            Interaction::Modal(modal) => self.handle_modal(&ctx, &modal).await,
            _ => {}
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiscordSettings {
    pub token: String,
    /// Register commands in this guild only; global registration otherwise.
    pub guild_id: Option<u64>,
    pub sessions: RegistrySettings,
    pub tutorial: TutorialImages,
}

pub struct DiscordAdapter {
    settings: DiscordSettings,
}

impl DiscordAdapter {
    pub fn new(settings: DiscordSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ChannelAdapter for DiscordAdapter {
    fn name(&self) -> &str { "discord" }

    async fn start(&self) -> anyhow::Result<()> {
        info!("Starting Discord adapter");
        let settings = &self.settings;

        let http = Arc::new(Http::new(&settings.token));
        let me = http.get_current_user().await.context("Failed to fetch the bot user; is the token valid?")?;
        let default_color = settings.sessions.default_color;

        let mut images = settings.tutorial.clone();
        if images.author_icon_url.is_none() {
            images.author_icon_url = Some(me.face());
        }
        let context = SessionContext::new(TutorialOverlay::new(default_color, &images));
        let delivery = Arc::new(SerenityDelivery::new(http.clone(), me.id.get(), default_color));
        let panels = Arc::new(DiscordPanels::new(http));
        let sessions = SessionRegistry::new(context, delivery, panels.clone(), settings.sessions.clone());

        let handler = Handler { sessions, panels, guild_id: settings.guild_id };
        let mut client = Client::builder(&settings.token, GatewayIntents::GUILDS)
            .event_handler(handler)
            .await?;

        if let Err(why) = client.start().await {
            error!("Client error: {:?}", why);
            anyhow::bail!("Discord client error: {:?}", why);
        }

        Ok(())
    }
}
