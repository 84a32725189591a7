//! Provider onboarding emails.

use super::provider::EmailMessage;

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Welcome email for a newly created account, carrying the temporary password.
pub fn welcome(to: &str, display_name: &str, password: &str, login_url: &str) -> EmailMessage {
    let name = escape_html(display_name);
    let html = format!(
        "<h1>¡Bienvenido a Domify, {name}!</h1>\
         <p>Tu solicitud para ser proveedor fue aprobada.</p>\
         <p>Puedes ingresar con estos datos:</p>\
         <ul><li>Correo: <strong>{email}</strong></li>\
         <li>Contraseña temporal: <strong>{password}</strong></li></ul>\
         <p>Por seguridad, cambia tu contraseña al iniciar sesión por primera vez.</p>\
         <p><a href=\"{login_url}\">Iniciar sesión</a></p>",
        email = escape_html(to),
        password = escape_html(password),
        login_url = escape_html(login_url),
    );
    let text = format!(
        "¡Bienvenido a Domify, {display_name}!\n\n\
         Tu solicitud para ser proveedor fue aprobada.\n\
         Correo: {to}\n\
         Contraseña temporal: {password}\n\n\
         Cambia tu contraseña al iniciar sesión por primera vez: {login_url}\n"
    );

    EmailMessage {
        to: to.to_string(),
        subject: "¡Tu cuenta de proveedor en Domify está lista!".to_string(),
        html,
        text: Some(text),
    }
}

/// Notice for an existing account whose provider profile was just activated.
pub fn profile_activated(to: &str, display_name: &str, login_url: &str) -> EmailMessage {
    let name = escape_html(display_name);
    let html = format!(
        "<h1>¡Hola, {name}!</h1>\
         <p>Tu solicitud fue aprobada y tu perfil de proveedor ya está activo.</p>\
         <p>Ingresa con tu cuenta de siempre para empezar a recibir solicitudes.</p>\
         <p><a href=\"{login_url}\">Iniciar sesión</a></p>",
        login_url = escape_html(login_url),
    );
    let text = format!(
        "¡Hola, {display_name}!\n\n\
         Tu solicitud fue aprobada y tu perfil de proveedor ya está activo.\n\
         Ingresa con tu cuenta de siempre: {login_url}\n"
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Tu perfil de proveedor en Domify está activo".to_string(),
        html,
        text: Some(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_embeds_credentials_and_link() {
        let message = welcome(
            "ana@example.com",
            "Ana",
            "Abc123defGHI",
            "https://domify.test/login",
        );
        assert_eq!(message.to, "ana@example.com");
        assert!(message.html.contains("Abc123defGHI"));
        assert!(message.html.contains("https://domify.test/login"));
        assert!(message.text.unwrap().contains("Abc123defGHI"));
    }

    #[test]
    fn test_activated_has_no_password_section() {
        let message = profile_activated("ana@example.com", "Ana", "https://domify.test/login");
        assert!(!message.html.contains("Contraseña"));
        assert!(message.subject.contains("activo"));
    }

    #[test]
    fn test_display_name_is_escaped() {
        let message = profile_activated("a@b.co", "<script>", "https://domify.test");
        assert!(message.html.contains("&lt;script&gt;"));
        assert!(!message.html.contains("<script>"));
    }
}
