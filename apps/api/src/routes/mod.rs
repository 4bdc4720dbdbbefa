pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::state::AppState;
use crate::{auth, folders, journal, notes, tasks, trash, user_config};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handlers::handle_register))
        .route("/api/auth/login", post(auth::handlers::handle_login))
        .route("/api/auth/validate", post(auth::handlers::handle_validate))
        .route("/api/auth/me", get(auth::handlers::handle_me))
        .route("/api/auth/health", get(auth::handlers::handle_health))
        // Notes
        .route(
            "/api/notas",
            get(notes::handlers::handle_list).post(notes::handlers::handle_create),
        )
        .route("/api/notas/favoritas", get(notes::handlers::handle_favorites))
        .route("/api/notas/archivadas", get(notes::handlers::handle_archived))
        .route("/api/notas/buscar", get(notes::handlers::handle_search))
        .route("/api/notas/etiquetas", get(notes::handlers::handle_tags))
        .route(
            "/api/notas/carpeta/:folder_id",
            get(notes::handlers::handle_by_folder),
        )
        .route(
            "/api/notas/:id",
            get(notes::handlers::handle_get)
                .put(notes::handlers::handle_update)
                .delete(notes::handlers::handle_delete),
        )
        .route(
            "/api/notas/:id/favorita",
            patch(notes::handlers::handle_toggle_favorite),
        )
        .route(
            "/api/notas/:id/archivar",
            patch(notes::handlers::handle_toggle_archived),
        )
        .route("/api/notas/:id/mover", put(notes::handlers::handle_move))
        .route("/api/notas/:id/restaurar", post(notes::handlers::handle_restore))
        .route(
            "/api/notas/:id/permanente",
            delete(notes::handlers::handle_delete_permanently),
        )
        // Tasks
        .route(
            "/api/tareas",
            get(tasks::handlers::handle_list).post(tasks::handlers::handle_create),
        )
        .route("/api/tareas/pendientes", get(tasks::handlers::handle_pending))
        .route("/api/tareas/vencidas", get(tasks::handlers::handle_overdue))
        .route("/api/tareas/kanban", get(tasks::handlers::handle_kanban))
        .route("/api/tareas/estadisticas", get(tasks::handlers::handle_stats))
        .route(
            "/api/tareas/estado/:status",
            get(tasks::handlers::handle_by_status),
        )
        .route(
            "/api/tareas/prioridad/:priority",
            get(tasks::handlers::handle_by_priority),
        )
        .route(
            "/api/tareas/:id",
            get(tasks::handlers::handle_get)
                .put(tasks::handlers::handle_update)
                .delete(tasks::handlers::handle_delete),
        )
        .route(
            "/api/tareas/:id/completar",
            patch(tasks::handlers::handle_toggle_complete),
        )
        .route("/api/tareas/:id/mover", put(tasks::handlers::handle_move))
        .route("/api/tareas/:id/restaurar", post(tasks::handlers::handle_restore))
        .route(
            "/api/tareas/:id/permanente",
            delete(tasks::handlers::handle_delete_permanently),
        )
        // Folders
        .route(
            "/api/carpetas",
            get(folders::handlers::handle_list).post(folders::handlers::handle_create),
        )
        .route("/api/carpetas/orden", put(folders::handlers::handle_reorder))
        .route(
            "/api/carpetas/:id",
            get(folders::handlers::handle_get)
                .put(folders::handlers::handle_update)
                .delete(folders::handlers::handle_delete),
        )
        // Journal
        .route(
            "/api/diario",
            get(journal::handlers::handle_list).post(journal::handlers::handle_create),
        )
        .route(
            "/api/diario/pin",
            get(journal::handlers::handle_pin_status)
                .put(journal::handlers::handle_set_pin)
                .delete(journal::handlers::handle_remove_pin),
        )
        .route(
            "/api/diario/pin/verificar",
            post(journal::handlers::handle_verify_global_pin),
        )
        .route(
            "/api/diario/:fecha",
            get(journal::handlers::handle_get)
                .put(journal::handlers::handle_update)
                .delete(journal::handlers::handle_delete),
        )
        .route(
            "/api/diario/:fecha/verificar-pin",
            post(journal::handlers::handle_verify_pin),
        )
        .route(
            "/api/diario/:fecha/desbloquear",
            post(journal::handlers::handle_unlock),
        )
        // User settings
        .route(
            "/api/configuracionusuario",
            get(user_config::handlers::handle_get).put(user_config::handlers::handle_update),
        )
        .route(
            "/api/configuracionusuario/restablecer",
            post(user_config::handlers::handle_reset),
        )
        // Trash
        .route("/api/papelera", get(trash::handlers::handle_list))
        .route("/api/papelera/contar", get(trash::handlers::handle_count))
        .route(
            "/api/papelera/vaciar",
            delete(trash::handlers::handle_empty),
        )
        .route(
            "/api/papelera/:tipo/:id",
            delete(trash::handlers::handle_purge),
        )
        .route(
            "/api/papelera/:tipo/:id/restaurar",
            post(trash::handlers::handle_restore),
        )
        .with_state(state)
}
