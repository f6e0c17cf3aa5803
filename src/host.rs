use crate::build_info::BuildInfo;
use crate::error::{Error, Result};
use crate::ftp::{self, FtpClient, FtpClientFactory, SuppaFtpFactory, SERVICE_READY};
use crate::models::FtpHostConfiguration;
use crate::session::FtpSession;

impl FtpHostConfiguration {
    /// Connect, log in and enter the remote root using a fresh
    /// `suppaftp` client.
    pub fn create_session(&self, build_info: &BuildInfo) -> Result<FtpSession> {
        self.create_session_with(build_info, &SuppaFtpFactory)
    }

    pub fn create_session_with(
        &self,
        build_info: &BuildInfo,
        factory: &dyn FtpClientFactory,
    ) -> Result<FtpSession> {
        self.validate()?;

        let span = tracing::info_span!("ftp_session", host = %self.name, build = %build_info.build_id());
        let _enter = span.enter();

        let mut client = factory.create_client();
        let ret = self
            .connect_and_login(client.as_mut(), build_info)
            .and_then(|()| self.resolve_remote_root(client.as_mut()));

        match ret {
            Ok(root) => {
                tracing::info!("Session ready on {}, remote root [{}]", self.hostname, root);
                Ok(FtpSession::new(client, root, self.name.clone()))
            }
            Err(e) => {
                tracing::error!("Failed to open session: {}", e);
                ftp::disconnect_quietly(client.as_mut());
                Err(e)
            }
        }
    }

    /// Run `f` with a new session, closing it on every exit path.
    pub fn with_session<T, F>(&self, build_info: &BuildInfo, f: F) -> Result<T>
    where
        F: FnOnce(&mut FtpSession) -> Result<T>,
    {
        self.with_session_using(build_info, &SuppaFtpFactory, f)
    }

    pub fn with_session_using<T, F>(
        &self,
        build_info: &BuildInfo,
        factory: &dyn FtpClientFactory,
        f: F,
    ) -> Result<T>
    where
        F: FnOnce(&mut FtpSession) -> Result<T>,
    {
        let mut session = self.create_session_with(build_info, factory)?;
        let ret = f(&mut session);
        session.close();
        ret
    }

    /// Timeouts, connect, greeting check, transfer mode and login, in
    /// that order. The caller owns cleanup of `client` on failure.
    pub(crate) fn connect_and_login(
        &self,
        client: &mut dyn FtpClient,
        build_info: &BuildInfo,
    ) -> Result<()> {
        let timeout = self.timeout_duration();
        client.set_default_timeout(timeout);
        client.set_data_timeout(timeout);

        build_info.println(&format!(
            "Connecting to {} on port {}",
            self.hostname, self.port
        ));
        client
            .connect(&self.hostname, self.port)
            .map_err(|source| Error::Connect {
                host: self.hostname.clone(),
                port: self.port,
                source,
            })?;
        print_reply(client, build_info);

        let code = client.reply_code();
        if code != SERVICE_READY {
            return Err(Error::ServiceNotReady {
                host: self.hostname.clone(),
                port: self.port,
                code,
                reply: client.reply_string(),
            });
        }

        if self.use_active_data {
            tracing::debug!("Using active data mode");
            client.enter_local_active_mode();
        } else {
            tracing::debug!("Using passive data mode");
            client.enter_local_passive_mode();
        }

        let logged_in = client
            .login(&self.username, self.password.expose())
            .map_err(|source| Error::Connect {
                host: self.hostname.clone(),
                port: self.port,
                source,
            })?;
        print_reply(client, build_info);
        if !logged_in {
            return Err(Error::Authentication {
                host: self.hostname.clone(),
                port: self.port,
                username: self.username.clone(),
            });
        }
        build_info.println(&format!("Logged in to {} as {}", self.hostname, self.username));
        Ok(())
    }

    /// A blank root means "where the server put us" and is asked for with
    /// PWD. Any other root is entered and then used verbatim, even when it
    /// is relative.
    fn resolve_remote_root(&self, client: &mut dyn FtpClient) -> Result<String> {
        match self.effective_remote_root() {
            None => client
                .print_working_directory()
                .map_err(|source| Error::WorkingDirectory {
                    host: self.hostname.clone(),
                    source,
                }),
            Some(dir) => {
                tracing::debug!("Changing to remote root [{}]", dir);
                match client.change_working_directory(dir) {
                    Ok(true) => Ok(dir.to_string()),
                    Ok(false) => Err(Error::Directory {
                        host: self.hostname.clone(),
                        directory: dir.to_string(),
                        source: None,
                    }),
                    Err(source) => Err(Error::Directory {
                        host: self.hostname.clone(),
                        directory: dir.to_string(),
                        source: Some(source),
                    }),
                }
            }
        }
    }
}

fn print_reply(client: &dyn FtpClient, build_info: &BuildInfo) {
    if !build_info.is_verbose() {
        return;
    }
    if let Some(reply) = client.reply_string() {
        build_info.println(reply.trim_end());
    }
}
