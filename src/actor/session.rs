use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::actor::error::Error;
use crate::actor::model::{Command, ResponseSignal, SessionMessage, Task};
use crate::api::model::ApiResponse;
use crate::config::GameConfig;
use crate::game::GameService;

const MAILBOX_SIZE: usize = 100;

/// Cheap handle to a session actor. The actor is the only owner of its
/// `GameService`, so commands are applied one at a time in arrival order.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: Uuid,
    sender: mpsc::Sender<SessionMessage>,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn submit(&self, task: Task) -> Result<(), Error> {
        self.sender
            .send(SessionMessage::Task(task))
            .await
            .map_err(|_| Error::SessionClosed(self.id))
    }

    pub async fn stop(&self) {
        if self.sender.send(SessionMessage::Stop).await.is_err() {
            tracing::debug!("Session {} already stopped", self.id);
        }
    }
}

pub fn spawn_session(id: Uuid, config: &GameConfig) -> (SessionHandle, JoinHandle<()>) {
    let (sender, receiver) = mpsc::channel(MAILBOX_SIZE);
    let game = GameService::new(config);
    let handle = tokio::spawn(run(id, game, receiver));
    (SessionHandle { id, sender }, handle)
}

async fn run(id: Uuid, mut game: GameService, mut receiver: mpsc::Receiver<SessionMessage>) {
    tracing::info!("Session {} started", id);

    while let Some(message) = receiver.recv().await {
        match message {
            SessionMessage::Task(task) => {
                tracing::debug!("Session {} handling {:?}", id, task.command);
                let response = execute(&mut game, &task.request_id, task.command);
                if let Err(e) = task.respond_to.send(ResponseSignal::Reply(response)).await {
                    tracing::warn!("Session {} failed to send response: {}", id, e);
                }
            }
            SessionMessage::Stop => {
                tracing::debug!("Session {} received stop", id);
                break;
            }
        }
    }

    tracing::info!("Session {} stopped", id);
}

pub fn execute(game: &mut GameService, request_id: &str, command: Command) -> ApiResponse {
    match command {
        Command::ListResources => ApiResponse::data(request_id, game.stocks()),
        Command::ListBuildings => ApiResponse::data(request_id, game.list_buildings()),
        Command::Catalog => ApiResponse::data(request_id, game.get_building_catalog()),
        Command::ListResearch => ApiResponse::data(request_id, game.list_research()),
        Command::TradingCities => ApiResponse::data(request_id, game.get_trading_cities()),
        Command::CityOffers { city } => {
            ApiResponse::data(request_id, game.get_city_offers(&city))
        }
        Command::Tick => {
            let report = game.tick();
            let summary = if report.notices.is_empty() {
                format!("Tick {} complete", report.tick)
            } else {
                report
                    .notices
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            ApiResponse::data(request_id, report).with_message(summary)
        }
        Command::Research { tech } => reply(request_id, game.research(&tech)),
        Command::Build { kind } => reply(request_id, game.build(&kind)),
        Command::BuildShip => reply(request_id, game.build_ship()),
        Command::Upgrade { building_id } => reply(request_id, game.upgrade(building_id)),
        Command::OpenMarket => reply(request_id, game.open_market()),
        Command::Trade { city, offer_index } => {
            reply(request_id, game.trade(&city, offer_index))
        }
        Command::Raid => reply(request_id, game.raid()),
    }
}

fn reply(request_id: &str, result: crate::game::ActionResult) -> ApiResponse {
    ApiResponse::outcome(request_id, result.success, result.message)
}
