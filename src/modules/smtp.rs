use crate::configuration::SmtpSettings;
use anyhow::Context;
use lettre::message::Mailbox;
use lettre::message::MultiPart;
use lettre::transport::smtp::response::Response;
use lettre::transport::smtp::AsyncSmtpTransport;
use lettre::transport::smtp::Error;
use lettre::{Address, AsyncTransport, Message, Tokio1Executor};
use maud::html;

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Address,
}

impl Mailer {
    pub fn new(config: SmtpSettings) -> Self {
        Self {
            transport: AsyncSmtpTransport::<Tokio1Executor>::relay(&config.relay)
                .unwrap()
                .credentials(config.get_credentials())
                .build(),
            sender: config.get_address(),
        }
    }

    async fn send_mail(
        &self,
        email: Mailbox,
        subject: &str,
        multipart: MultiPart,
    ) -> Result<Response, Error> {
        let res = self
            .transport
            .send(
                Message::builder()
                    .from(Mailbox::new(
                        Some(String::from("Faxinex")),
                        self.sender.clone(),
                    ))
                    .to(email)
                    .subject(subject)
                    .multipart(multipart)
                    .unwrap(),
            )
            .await?;

        Ok(res)
    }

    pub async fn send_group_invitation(
        &self,
        email: &str,
        group_id: &str,
    ) -> Result<(), anyhow::Error> {
        let email = email.parse::<Address>().context("Failed to parse email")?;

        let body = html! {
            p { "Olá," }
            p { "Você foi convidado a fazer parte de um grupo exclusivo em nossa plataforma!" }
            p { "Para ingressar no grupo, utilize o código abaixo durante o processo de entrada:" }
            p { b { "Código do Grupo: " (group_id) } }
            p { "Estamos ansiosos para ter você conosco. Caso tenha dúvidas ou precise de ajuda, não hesite em entrar em contato." }
            p { "Atenciosamente," br; "Equipe Faxinex" }
        }
        .into_string();

        let plain = format!(
            "Olá,\n\n\
            Você foi convidado a fazer parte de um grupo exclusivo em nossa plataforma!\n\n\
            Para ingressar no grupo, utilize o código abaixo durante o processo de entrada:\n\n\
            Código do Grupo: {group_id}\n\n\
            Estamos ansiosos para ter você conosco. Caso tenha dúvidas ou precise de ajuda, não hesite em entrar em contato.\n\n\
            Atenciosamente,\nEquipe Faxinex"
        );

        self.send_mail(
            Mailbox::new(None, email),
            "Convite para Participar do Grupo",
            MultiPart::alternative_plain_html(plain, body),
        )
        .await?;

        Ok(())
    }
}
