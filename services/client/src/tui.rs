//! services/client/src/tui.rs
//!
//! The terminal front-end: an entry screen (login/register) and a protected
//! interact screen (attach/chat loop). Pure view code; every state change
//! goes through a controller operation, and the route guard is consulted on
//! every screen transition.

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use crate::error::ClientError;
use vibebot_core::{
    AuthError, AuthMode, AuthOutcome, Controller, Credentials, Role, Route, RouteDecision,
    SourceFile,
};

pub struct Tui {
    controller: Arc<Controller>,
    input: Lines<BufReader<Stdin>>,
    /// How many conversation entries have been printed so far.
    rendered: usize,
}

impl Tui {
    pub fn new(controller: Arc<Controller>) -> Self {
        Self {
            controller,
            input: BufReader::new(tokio::io::stdin()).lines(),
            rendered: 0,
        }
    }

    /// Runs the screen loop until the user quits or stdin closes.
    pub async fn run(&mut self) -> Result<(), ClientError> {
        let mut route = Route::Entry;
        loop {
            route = match self.controller.guard_route(route).await {
                RouteDecision::Allow => route,
                RouteDecision::Redirect(next) => {
                    debug!(?next, "route guard redirect");
                    next
                }
            };

            let next = match route {
                Route::Entry => self.entry_screen().await?,
                Route::Interact => self.interact_screen().await?,
            };
            match next {
                Some(next) => route = next,
                None => return Ok(()),
            }
        }
    }

    //---------------------------------------------------------------------------------
    // Entry screen
    //---------------------------------------------------------------------------------

    async fn entry_screen(&mut self) -> Result<Option<Route>, ClientError> {
        println!();
        println!("== vibebot ==");
        println!("Process audio, video, and documents to chat with your data.");

        loop {
            println!();
            let Some(choice) = self.read_line("[1] Login  [2] Register  [q] Quit > ").await? else {
                return Ok(None);
            };

            match choice.trim() {
                "1" => {
                    if self.login_form().await? {
                        return Ok(Some(Route::Interact));
                    }
                }
                "2" => self.register_form().await?,
                "q" | "quit" => return Ok(None),
                "" => {}
                other => println!("Unrecognized choice '{other}'."),
            }
        }
    }

    /// Returns true once a login succeeds.
    async fn login_form(&mut self) -> Result<bool, ClientError> {
        let Some(username) = self.read_line("Email or username: ").await? else {
            return Ok(false);
        };
        let Some(password) = self.read_line("Password: ").await? else {
            return Ok(false);
        };

        let credentials = Credentials {
            username: username.trim().to_string(),
            email: None,
            password,
        };

        match self
            .controller
            .authenticate(AuthMode::Login, &credentials)
            .await
        {
            Ok(AuthOutcome::LoggedIn(session)) => {
                println!("Login successful. Welcome, {}!", session.username);
                Ok(true)
            }
            Ok(AuthOutcome::Registered) => Ok(false),
            Err(err) => {
                print_auth_error(err);
                Ok(false)
            }
        }
    }

    async fn register_form(&mut self) -> Result<(), ClientError> {
        let Some(username) = self.read_line("Username: ").await? else {
            return Ok(());
        };
        let Some(email) = self.read_line("Email: ").await? else {
            return Ok(());
        };
        let Some(password) = self.read_line("Password: ").await? else {
            return Ok(());
        };

        let credentials = Credentials {
            username: username.trim().to_string(),
            email: Some(email.trim().to_string()),
            password,
        };

        match self
            .controller
            .authenticate(AuthMode::Register, &credentials)
            .await
        {
            Ok(_) => println!("Registered successfully, please login."),
            Err(err) => print_auth_error(err),
        }
        Ok(())
    }

    //---------------------------------------------------------------------------------
    // Interact screen
    //---------------------------------------------------------------------------------

    async fn interact_screen(&mut self) -> Result<Option<Route>, ClientError> {
        println!();
        println!("Type a question about the attached file, or /help for commands.");

        loop {
            self.render_new_entries().await;

            let Some(line) = self.read_line("> ").await? else {
                return Ok(None);
            };
            let line = line.trim().to_string();

            match line.split_whitespace().next() {
                Some("/help") => print_help(),
                Some("/attach") => {
                    let path = line["/attach".len()..].trim();
                    if path.is_empty() {
                        println!("Usage: /attach <path>");
                    } else {
                        self.attach(path).await?;
                    }
                }
                Some("/remove") => self.controller.remove_attachment().await,
                Some("/file") => self.show_file_details().await,
                Some("/transcript") => self.show_transcript().await,
                Some("/summary") => self.show_summary().await,
                Some("/logout") => {
                    self.controller.logout().await;
                    println!("Logged out.");
                    return Ok(Some(Route::Entry));
                }
                Some("/quit") => return Ok(None),
                Some(other) if other.starts_with('/') => {
                    println!("Unknown command '{other}'. Try /help.");
                }
                Some(_) => {
                    if !self.controller.ask(&line).await {
                        println!("Attach a file first. Questions need a processed transcript.");
                    }
                }
                None => {}
            }
        }
    }

    async fn attach(&mut self, path: &str) -> Result<(), ClientError> {
        let path = Path::new(path);
        let content = match tokio::fs::read(path).await {
            Ok(content) => Bytes::from(content),
            Err(err) => {
                println!("Could not read {}: {err}", path.display());
                return Ok(());
            }
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream");

        println!("Processing {name}...");
        let kind = self
            .controller
            .attach_file(SourceFile::new(name, mime_type, content))
            .await;
        debug!(%kind, "attachment classified");
        Ok(())
    }

    async fn show_file_details(&self) {
        match self.controller.attachment().await {
            Some(attachment) => {
                println!(
                    "{} ({}, {} bytes)",
                    attachment.file.name,
                    attachment.kind,
                    attachment.file.size()
                );
            }
            None => println!("No file attached."),
        }
    }

    async fn show_transcript(&self) {
        let transcript = self
            .controller
            .attachment()
            .await
            .and_then(|a| a.transcript);
        match transcript {
            Some(text) => println!("{text}"),
            None => println!("No transcript available."),
        }
    }

    async fn show_summary(&self) {
        let summary = self.controller.attachment().await.and_then(|a| a.summary);
        match summary {
            Some(text) => println!("{text}"),
            None => println!("No summary available."),
        }
    }

    //---------------------------------------------------------------------------------
    // Rendering and input
    //---------------------------------------------------------------------------------

    /// Prints conversation entries appended since the last render. `ask`
    /// resolves its placeholder before returning, so the thinking marker is
    /// normally already replaced by the time it is printed.
    async fn render_new_entries(&mut self) {
        let conversation = self.controller.conversation().await;
        for entry in conversation.iter().skip(self.rendered) {
            match entry.role {
                Role::Assistant => println!("bot> {}", entry.content),
                Role::User => println!("you> {}", entry.content),
            }
        }
        self.rendered = conversation.len();
    }

    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ClientError> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        Ok(self.input.next_line().await?)
    }
}

fn print_auth_error(err: AuthError) {
    match err {
        AuthError::Validation(errors) => {
            for error in errors {
                println!("  {error}");
            }
        }
        AuthError::Backend(message) => println!("{message}"),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /attach <path>   upload a PDF, audio, or video file");
    println!("  /remove          remove the attached file");
    println!("  /file            show attached file details");
    println!("  /transcript      show the extracted transcript");
    println!("  /summary         show the generated summary");
    println!("  /logout          clear the session and return to login");
    println!("  /quit            exit");
    println!("Anything else is sent as a question about the attached file.");
}
