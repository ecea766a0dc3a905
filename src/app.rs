//! Interactive terminal front end
//!
//! Draws the current screen, offers a menu of actions for it, and feeds the
//! choice back into the shell. One action runs at a time.

use dialoguer::Select;

use crate::config::Config;
use crate::content::Catalog;
use crate::conversation::ChatRole;
use crate::practice::PracticeState;
use crate::progress::FileProgressStore;
use crate::render;
use crate::shell::{Shell, View};
use crate::tutor::{Speaker, TutorClient};
use crate::voice::{
    MicrophoneRecognizer, SpeechRecognizer, TypedRecognizer, UnavailableRecognizer,
};
use crate::{Error, Result};

/// Menu entries
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Go(View),
    Practice(String),
    Listen(String),
    PlayTarget,
    Speak,
    Type,
    Ask(&'static str),
    Replay { index: usize, preview: String },
    ToggleTutor,
    Close,
    Quit,
}

/// Wires the shell to real devices and the remote tutor
pub struct App {
    shell: Shell,
    tutor: TutorClient,
    recognizer: Box<dyn SpeechRecognizer>,
}

impl App {
    /// Build the app from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the embedded content is malformed
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = Catalog::embedded()?;
        let store = FileProgressStore::new(&config.data_dir);
        let shell = Shell::new(catalog, Box::new(store), config.success_delay);

        let recognizer: Box<dyn SpeechRecognizer> = match MicrophoneRecognizer::from_config(config)
        {
            Ok(recognizer) => Box::new(recognizer),
            Err(e) => {
                tracing::info!(reason = %e, "speech recognition unavailable");
                Box::new(UnavailableRecognizer::new(e.to_string()))
            }
        };

        Ok(Self {
            shell,
            tutor: TutorClient::from_config(config),
            recognizer,
        })
    }

    #[must_use]
    pub const fn shell(&self) -> &Shell {
        &self.shell
    }

    #[must_use]
    pub const fn tutor(&self) -> &TutorClient {
        &self.tutor
    }

    /// Run the full interactive app until the learner quits
    ///
    /// # Errors
    ///
    /// Returns error if terminal input fails
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            println!("\n{}", render::screen(&self.shell));

            let actions = self.actions();
            let labels = actions.iter().map(label).collect();
            let action = actions[select("Choose", labels).await?].clone();

            if action == Action::Quit {
                return Ok(());
            }
            self.perform(action).await?;
        }
    }

    /// Practice a single phrase until it passes or is closed
    ///
    /// # Errors
    ///
    /// Returns error if the phrase is unknown or terminal input fails
    pub async fn run_practice(&mut self, phrase_id: &str) -> anyhow::Result<()> {
        self.shell.open_practice(phrase_id)?;

        while self.shell.practice().is_some() {
            println!("\n{}", render::screen(&self.shell));

            let actions = Self::practice_actions();
            let labels = actions.iter().map(label).collect();
            let action = actions[select("Choose", labels).await?].clone();
            self.perform(action).await?;
        }
        Ok(())
    }

    /// Hold a conversation until the learner leaves
    ///
    /// # Errors
    ///
    /// Returns error if terminal input fails
    pub async fn run_conversation(&mut self, tutor_mode: bool) -> anyhow::Result<()> {
        self.open_conversation(tutor_mode).await;

        while self.shell.view() == View::Conversation {
            println!("\n{}", render::screen(&self.shell));

            let mut actions = self.conversation_actions();
            actions.push(Action::Quit);
            let labels = actions.iter().map(label).collect();
            match actions[select("Choose", labels).await?].clone() {
                Action::Go(_) | Action::Quit => return Ok(()),
                action => self.perform(action).await?,
            }
        }
        Ok(())
    }

    /// Enter the conversation view and request the greeting in `tutor_mode`
    pub async fn open_conversation(&mut self, tutor_mode: bool) {
        self.enter(View::Conversation, tutor_mode).await;
    }

    /// Speak transcript message `index` again, false if it is not the tutor's
    pub async fn replay(&self, index: usize) -> bool {
        match self.shell.conversation() {
            Some(session) => session.replay(index, &self.tutor).await,
            None => false,
        }
    }

    fn actions(&self) -> Vec<Action> {
        if self.shell.practice().is_some() {
            return Self::practice_actions();
        }

        let mut actions = match self.shell.view() {
            View::Dashboard => Vec::new(),
            View::Lessons => self
                .shell
                .catalog()
                .lessons()
                .iter()
                .flat_map(|l| &l.phrases)
                .flat_map(|p| [Action::Practice(p.id.clone()), Action::Listen(p.english.clone())])
                .collect(),
            View::Vocabulary => self
                .shell
                .catalog()
                .vocabulary()
                .iter()
                .map(|w| Action::Listen(w.english.clone()))
                .collect(),
            View::Conversation => self.conversation_actions(),
        };

        actions.extend(
            View::ALL
                .into_iter()
                .filter(|&v| v != self.shell.view())
                .map(Action::Go),
        );
        actions.push(Action::Quit);
        actions
    }

    fn practice_actions() -> Vec<Action> {
        vec![Action::Speak, Action::Type, Action::PlayTarget, Action::Close]
    }

    fn conversation_actions(&self) -> Vec<Action> {
        let mut actions = vec![Action::Speak, Action::Type];
        if let Some(session) = self.shell.conversation() {
            actions.extend(session.suggestions().iter().map(|&s| Action::Ask(s)));
            actions.extend(
                session
                    .messages()
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| m.role == ChatRole::Assistant)
                    .map(|(index, m)| Action::Replay {
                        index,
                        preview: m.text.clone(),
                    }),
            );
        }
        actions.push(Action::ToggleTutor);
        actions
    }

    async fn enter(&mut self, view: View, tutor_mode: bool) {
        let entering = view != self.shell.view();
        self.shell.navigate(view);
        if entering
            && view == View::Conversation
            && let Some(session) = self.shell.conversation_mut()
        {
            if tutor_mode != session.tutor_mode() {
                session.toggle_tutor_mode();
            }
            session.start(&self.tutor, &self.tutor).await;
        }
    }

    async fn perform(&mut self, action: Action) -> anyhow::Result<()> {
        match action {
            Action::Go(view) => self.enter(view, false).await,
            Action::Practice(id) => {
                self.shell.open_practice(&id)?;
            }
            Action::Listen(text) => self.tutor.speak(&text).await,
            Action::PlayTarget => {
                if let Some(session) = self.shell.practice() {
                    session.play_target(&self.tutor).await;
                }
            }
            Action::Speak => self.capture(None).await?,
            Action::Type => {
                let typed = TypedRecognizer::new("You say");
                self.capture(Some(&typed)).await?;
            }
            Action::Ask(question) => {
                if let Some(session) = self.shell.conversation_mut() {
                    session.send(question, &self.tutor, &self.tutor).await;
                }
            }
            Action::Replay { index, .. } => {
                self.replay(index).await;
            }
            Action::ToggleTutor => {
                if let Some(session) = self.shell.conversation_mut() {
                    session.toggle_tutor_mode();
                }
            }
            Action::Close => self.shell.close_practice(),
            Action::Quit => {}
        }
        Ok(())
    }

    /// One spoken (or typed) turn in whichever surface is active
    async fn capture(&mut self, typed: Option<&TypedRecognizer>) -> anyhow::Result<()> {
        let recognizer: &dyn SpeechRecognizer = match typed {
            Some(typed) => typed,
            None => self.recognizer.as_ref(),
        };

        if self.shell.practice().is_some() {
            let state = self.shell.capture_practice(recognizer, &self.tutor).await;
            if state == Some(PracticeState::Success) {
                println!("\n{}", render::screen(&self.shell));
                if self.shell.settle_practice().await {
                    println!("\n+{} points!", crate::progress::POINTS_PER_PRACTICE);
                }
            }
            return Ok(());
        }

        if let Some(session) = self.shell.conversation_mut() {
            match session.listen(recognizer, &self.tutor, &self.tutor).await {
                Ok(_) => {}
                Err(Error::Unsupported(_)) => {
                    println!("\n{}", crate::practice::UNSUPPORTED_NOTICE);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

fn label(action: &Action) -> String {
    match action {
        Action::Go(view) => format!("→ {}", view.label()),
        Action::Practice(id) => format!("Practice {id}"),
        Action::Listen(text) => format!("🔊 {text}"),
        Action::PlayTarget => "🔊 Listen".to_string(),
        Action::Speak => "🎤 Speak".to_string(),
        Action::Type => "⌨ Type instead".to_string(),
        Action::Ask(question) => format!("Ask: {question}"),
        Action::Replay { preview, .. } => format!("🔊 Replay: {preview}"),
        Action::ToggleTutor => "Toggle tutor mode".to_string(),
        Action::Close => "← Close".to_string(),
        Action::Quit => "Quit".to_string(),
    }
}

/// Show a menu off the async runtime's worker thread
async fn select(prompt: &str, items: Vec<String>) -> anyhow::Result<usize> {
    let prompt = prompt.to_string();
    let index = tokio::task::spawn_blocking(move || {
        Select::new()
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact()
    })
    .await??;
    Ok(index)
}
