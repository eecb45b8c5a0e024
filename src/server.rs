use crate::query::QueryService;
use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
}

#[get("/api/deployments")]
async fn get_deployments(query: web::Data<QueryService>) -> impl Responder {
    HttpResponse::Ok().json(query.get_local_deployments())
}

#[get("/api/pods")]
async fn get_pods(query: web::Data<QueryService>) -> impl Responder {
    HttpResponse::Ok().json(query.get_local_pods())
}

#[get("/api/resources")]
async fn get_resources(query: web::Data<QueryService>) -> impl Responder {
    HttpResponse::Ok().json(query.get_local())
}

#[get("/api/aggregate")]
async fn get_aggregate(query: web::Data<QueryService>) -> impl Responder {
    HttpResponse::Ok().json(query.get_aggregate())
}

#[get("/api/aggregate-deployments")]
async fn get_aggregate_deployments(query: web::Data<QueryService>) -> impl Responder {
    HttpResponse::Ok().json(query.get_aggregated_resources().deployments)
}

#[get("/api/aggregate-pods")]
async fn get_aggregate_pods(query: web::Data<QueryService>) -> impl Responder {
    HttpResponse::Ok().json(query.get_aggregated_resources().pods)
}

#[get("/api/aggregate-resources")]
async fn get_aggregate_resources(query: web::Data<QueryService>) -> impl Responder {
    HttpResponse::Ok().json(query.get_aggregated_resources())
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_deployments)
        .service(get_pods)
        .service(get_resources)
        .service(get_aggregate)
        .service(get_aggregate_deployments)
        .service(get_aggregate_pods)
        .service(get_aggregate_resources);
}

pub async fn run(config: ServerConfig, query: QueryService) -> anyhow::Result<()> {
    let query = web::Data::new(query);

    HttpServer::new(move || {
        let cors = Cors::default()
            .send_wildcard()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(query.clone())
            .wrap(cors)
            .configure(configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
