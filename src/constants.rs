// API constants
pub const CHAT_PATH: &str = "/api/chat";
pub const SERVER_INFO_PATH: &str = "/api/config";
pub const HEALTH_PATH: &str = "/api/health";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

// Fixed widget copy. The backend answers in Brazilian Portuguese, so the
// locally generated messages match.
pub const GREETING_TEXT: &str =
    "Estou aqui para ajudar com qualquer dúvida que você tenha. Sinta-se à vontade para perguntar!";

pub const FALLBACK_PREFIX: &str = "Desculpe, estou com dificuldades técnicas no momento. ";
pub const FALLBACK_NETWORK: &str =
    "Verifique sua conexão com a internet ou tente novamente mais tarde.";
pub const FALLBACK_SERVER: &str =
    "Nosso servidor está temporariamente indisponível. Tente novamente em alguns minutos.";
pub const FALLBACK_GENERIC: &str =
    "Por favor, tente novamente ou entre em contato pelo telefone para atendimento imediato.";

// Timings
pub const DEFAULT_GREETING_DELAY_MS: u64 = 3000;
pub const DEFAULT_TYPING_LINGER_MS: u64 = 1000;

// Header title used until the backend's company info arrives
pub const FALLBACK_TITLE: &str = "Atendimento";
