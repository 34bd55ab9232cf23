pub mod config;
pub mod error;
pub mod helpers;

pub mod handlers {
    pub mod achievements;
    pub mod countdown;
    pub mod daily_quests;
    pub mod economy_hooks;
    pub mod inventory;
    pub mod progress_store;
    pub mod question_pool;
    pub mod quiz_session;
    pub mod scheduler;
    pub mod shop;
    pub mod store;
    pub mod wallet;
}

pub mod loggers {
    pub mod file_logger;
}

pub mod models {
    pub mod commands;
    pub mod economy;
    pub mod events;
    pub mod progress;
    pub mod question;
    pub mod shop;
}
