//! Embedded deployment templates
//!
//! Placeholders use `{{NAME}}` and are replaced verbatim by the generator.
//! GitHub Actions' own `${{ ... }}` expressions survive substitution
//! because every placeholder name here is an exact, space-free match.

use crate::detect::Archetype;

/// Which template set a project uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateCategory {
    Python,
    Node,
    Spa,
}

impl TemplateCategory {
    pub fn for_archetype(archetype: Archetype) -> Self {
        match archetype {
            Archetype::Flask | Archetype::Django | Archetype::Fastapi => TemplateCategory::Python,
            Archetype::Nextjs | Archetype::Nuxtjs | Archetype::Nestjs => TemplateCategory::Node,
            Archetype::ReactSpa | Archetype::VueSpa => TemplateCategory::Spa,
        }
    }

    pub fn dockerfile(&self) -> &'static str {
        match self {
            TemplateCategory::Python => DOCKERFILE_PYTHON,
            TemplateCategory::Node => DOCKERFILE_NODE,
            TemplateCategory::Spa => DOCKERFILE_SPA,
        }
    }

    pub fn dockerignore(&self) -> &'static str {
        match self {
            TemplateCategory::Python => DOCKERIGNORE_PYTHON,
            TemplateCategory::Node | TemplateCategory::Spa => DOCKERIGNORE_NODE,
        }
    }
}

pub const DOCKERFILE_PYTHON: &str = r#"FROM python:3.11-slim

WORKDIR /app

COPY requirements.txt .
RUN {{BUILD_CMD}}

COPY . .

EXPOSE {{APP_PORT}}

CMD {{START_CMD}}
"#;

pub const DOCKERFILE_NODE: &str = r#"FROM node:20-alpine

WORKDIR /app

COPY package*.json ./
RUN npm ci

COPY . .
RUN {{BUILD_CMD}}

EXPOSE {{APP_PORT}}

CMD {{START_CMD}}
"#;

pub const DOCKERFILE_SPA: &str = r#"FROM node:20-alpine AS build

WORKDIR /app

COPY package*.json ./
RUN npm ci

COPY . .
RUN {{BUILD_CMD}}

FROM nginx:alpine

COPY nginx.conf /etc/nginx/conf.d/default.conf
COPY --from=build /app/dist /usr/share/nginx/html

EXPOSE 80
"#;

pub const DOCKERIGNORE_PYTHON: &str = r#"__pycache__/
*.pyc
.venv/
venv/
.env
.git/
.github/
shipwright.json
"#;

pub const DOCKERIGNORE_NODE: &str = r#"node_modules/
dist/
.next/
.env
.git/
.github/
shipwright.json
"#;

pub const DOCKER_COMPOSE: &str = r#"services:
  {{APP_NAME}}:
    build: .
    image: {{REGISTRY}}:latest
    restart: unless-stopped
    ports:
      - "{{APP_PORT}}:{{APP_PORT}}"
    env_file:
      - .env
"#;

pub const DEPLOY_WORKFLOW: &str = r#"name: Deploy

on:
  push:
    branches: ["{{PRODUCTION_BRANCH}}"]

jobs:
  deploy:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4

      - name: Sync repository to server
        uses: appleboy/scp-action@v0.1.7
        with:
          host: ${{ secrets.SERVER_HOST }}
          username: ${{ secrets.SERVER_USER }}
          key: ${{ secrets.SSH_PRIVATE_KEY }}
          source: "."
          target: ${{ secrets.DEPLOY_PATH }}/{{APP_NAME}}

      - name: Rebuild and restart
        uses: appleboy/ssh-action@v1.0.3
        with:
          host: ${{ secrets.SERVER_HOST }}
          username: ${{ secrets.SERVER_USER }}
          key: ${{ secrets.SSH_PRIVATE_KEY }}
          script: |
            cd ${{ secrets.DEPLOY_PATH }}/{{APP_NAME}}
            docker compose up -d --build
"#;

pub const NGINX_CONF: &str = r#"server {
    listen 80;
    server_name {{DOMAIN}};

    root /usr/share/nginx/html;
    index index.html;

    location / {
        try_files $uri $uri/ /index.html;
    }

    location ~* \.(js|css|png|jpg|jpeg|gif|ico|svg|woff2?)$ {
        expires 30d;
        add_header Cache-Control "public, immutable";
    }
}
"#;

pub const SERVER_INIT: &str = r#"#!/usr/bin/env bash
# First-time server preparation for {{APP_NAME}}
set -euo pipefail

echo "==> Updating packages"
export DEBIAN_FRONTEND=noninteractive
apt-get update -y
apt-get upgrade -y

if ! command -v docker >/dev/null 2>&1; then
    echo "==> Installing Docker"
    curl -fsSL https://get.docker.com | sh
fi

if ! docker compose version >/dev/null 2>&1; then
    echo "==> Installing the Docker Compose plugin"
    apt-get install -y docker-compose-plugin
fi

echo "==> Preparing deploy directory"
mkdir -p "{{DEPLOY_DIR}}/{{APP_NAME}}"
chown -R "{{SSH_USER}}" "{{DEPLOY_DIR}}/{{APP_NAME}}"

echo "==> Done. {{SSH_USER}}@{{SERVER_HOST}} is ready for {{APP_NAME}}"
"#;
