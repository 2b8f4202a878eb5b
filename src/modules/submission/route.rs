use actix_web::web;

use crate::modules::mail::MailTransport;

pub fn configure<M>(cfg: &mut web::ServiceConfig)
where
    M: MailTransport + Send + Sync + 'static,
{
    cfg.service(
        web::resource("/submissions")
            .route(web::post().to(crate::modules::submission::handle::submit_documents::<M>)),
    )
    .service(
        web::resource("/service-types")
            .route(web::get().to(crate::modules::submission::handle::list_service_types)),
    );
}
