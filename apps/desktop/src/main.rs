use std::{sync::Arc, time::Duration};

use iced::widget::{
    button, center, column, container, horizontal_space, row, scrollable, text, text_editor,
    text_input,
};
use iced::{Color, Element, Length, Task, Theme};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use viralscript_core::{
    GenerationClient, GenerationError, GenerationProvider, RequestController, RequestState,
    ResultView, ScriptAnalysisResult, Settings, render,
    render::{ANALYSIS_TITLE, SCRIPT_TITLE},
};

const TITLE: &str = "유튜브 떡상 대본 제조기";
const COPIED_FOR: Duration = Duration::from_secs(2);

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let settings = Settings::from_env()?;
    info!(
        provider = settings.provider.name(),
        model = %settings.model,
        "starting viralscript"
    );
    let controller = RequestController::new(Arc::new(GenerationClient::new(settings)));

    iced::application(TITLE, App::update, App::view)
        .theme(App::theme)
        .run_with(move || App::new(controller))?;

    Ok(())
}

struct App {
    transcript: text_editor::Content,
    topic: String,
    controller: RequestController,
    copied: bool,
}

#[derive(Debug, Clone)]
enum Message {
    TranscriptEdited(text_editor::Action),
    TopicChanged(String),
    Submit,
    Generated(Uuid, Result<ScriptAnalysisResult, GenerationError>),
    CopyScript,
    CopiedExpired,
}

impl App {
    fn new(controller: RequestController) -> (Self, Task<Message>) {
        (
            Self {
                transcript: text_editor::Content::new(),
                topic: String::new(),
                controller,
                copied: false,
            },
            Task::none(),
        )
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TranscriptEdited(action) => {
                self.transcript.perform(action);
                Task::none()
            }
            Message::TopicChanged(topic) => {
                self.topic = topic;
                Task::none()
            }
            Message::Submit => self.submit(),
            Message::Generated(request_id, outcome) => {
                self.controller.complete(request_id, outcome);
                Task::none()
            }
            Message::CopyScript => {
                let RequestState::Success(result) = self.controller.state() else {
                    return Task::none();
                };
                self.copied = true;
                Task::batch([
                    iced::clipboard::write(result.script),
                    Task::perform(tokio::time::sleep(COPIED_FOR), |_| Message::CopiedExpired),
                ])
            }
            Message::CopiedExpired => {
                self.copied = false;
                Task::none()
            }
        }
    }

    fn submit(&mut self) -> Task<Message> {
        // Enter in the topic field still fires while the button is disabled.
        if self.controller.is_loading() {
            return Task::none();
        }

        let Ok(request) = self.controller.begin(&self.transcript.text(), &self.topic) else {
            return Task::none();
        };
        self.copied = false;

        let provider = self.controller.provider();
        let request_id = request.id();
        Task::perform(
            async move { provider.generate(&request).await },
            move |outcome| Message::Generated(request_id, outcome),
        )
    }

    fn view(&self) -> Element<'_, Message> {
        row![
            container(self.form()).width(Length::FillPortion(1)),
            container(self.result())
                .width(Length::FillPortion(1))
                .height(Length::Fill),
        ]
        .spacing(24)
        .padding(24)
        .into()
    }

    fn form(&self) -> Element<'_, Message> {
        let loading = self.controller.is_loading();
        let label = if loading {
            "분석 및 생성 중..."
        } else {
            "대본 새로 만들기"
        };

        let mut form = column![
            text("원본 대본 (레퍼런스)").size(18),
            text("유튜브 자막 복붙").size(13),
            text_editor(&self.transcript)
                .on_action(Message::TranscriptEdited)
                .height(Length::Fixed(320.0)),
            text("새로운 주제").size(18),
            text_input(
                "예: 초보자도 할 수 있는 스마트스토어 창업 꿀팁",
                &self.topic
            )
            .on_input(Message::TopicChanged)
            .on_submit(Message::Submit)
            .padding(10),
            button(text(label))
                .on_press_maybe((!loading).then_some(Message::Submit))
                .padding(10),
        ]
        .spacing(12);

        if let Some(message) = self.controller.validation_error() {
            form = form.push(text(message).color(error_color()));
        }

        form.into()
    }

    fn result(&self) -> Element<'_, Message> {
        let state = self.controller.state();

        match render(&state) {
            ResultView::Placeholder { title, caption } => {
                center(column![text(title).size(20), text(caption).size(14)].spacing(8)).into()
            }
            ResultView::Loading { caption } => center(text(caption)).into(),
            ResultView::Panels { analysis, script } => {
                let copy = button(text(if self.copied { "복사됨" } else { "대본 복사" }).size(13))
                    .on_press(Message::CopyScript);

                column![
                    panel(ANALYSIS_TITLE, None, analysis.to_owned()),
                    panel(SCRIPT_TITLE, Some(copy.into()), script.to_owned()),
                ]
                .spacing(16)
                .into()
            }
            ResultView::Banner { message } => {
                center(text(message.to_owned()).color(error_color())).into()
            }
        }
    }
}

/// Titled box showing `body` as preformatted text.
fn panel<'a>(
    title: &'static str,
    action: Option<Element<'a, Message>>,
    body: String,
) -> Element<'a, Message> {
    let mut header = row![text(title).size(18), horizontal_space()];
    if let Some(action) = action {
        header = header.push(action);
    }

    container(column![header, scrollable(text(body))].spacing(10))
        .padding(16)
        .width(Length::Fill)
        .into()
}

fn error_color() -> Color {
    Color::from_rgb(0.97, 0.44, 0.44)
}
